use crate::application_port::{GatewayClientError, HealthReport};
use crate::domain_model::{CurrentUser, InvalidUserId, SessionPhase, SessionState};
use crate::domain_port::{ChatSessionError, StoreError};
use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidUserId(#[from] InvalidUserId),
    #[error("a login is already in progress")]
    LoginInProgress,
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
    #[error("login failed: {0}")]
    Gateway(#[from] GatewayClientError),
    #[error("credential storage failed: {0}")]
    Store(#[from] StoreError),
    #[error("failed to initialize chat: {0}")]
    Connect(#[from] ChatSessionError),
}

/// Owns the client's session lifecycle:
/// `Connecting -> {Authenticated, Unauthenticated}`,
/// `Unauthenticated -(login)-> Connecting`,
/// `Authenticated -(logout)-> Unauthenticated`.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Reconcile stored credentials with a live connection. Never fails; any
    /// problem ends in `Unauthenticated` with the stored credentials cleared.
    async fn restore_session(&self) -> SessionState;
    async fn login(&self, user_id: &str) -> Result<CurrentUser, SessionError>;
    async fn logout(&self) -> Result<(), SessionError>;
    async fn check_gateway(&self) -> Result<HealthReport, SessionError>;
    fn state(&self) -> SessionState;
    fn subscribe(&self) -> watch::Receiver<SessionState>;
}
