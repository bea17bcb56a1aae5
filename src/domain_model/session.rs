use crate::domain_model::*;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Connecting,
    Authenticated,
    Unauthenticated,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Connecting => "connecting",
            SessionPhase::Authenticated => "authenticated",
            SessionPhase::Unauthenticated => "unauthenticated",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub token: ChatToken,
    pub user_data: Option<ChatUser>,
}

/// In-memory view of the session that a UI renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub current_user: Option<CurrentUser>,
}

impl SessionState {
    /// Every process starts out connecting until stored credentials are checked.
    pub fn initial() -> Self {
        SessionState {
            phase: SessionPhase::Connecting,
            current_user: None,
        }
    }

    pub fn connecting(&self) -> bool {
        self.phase == SessionPhase::Connecting
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}
