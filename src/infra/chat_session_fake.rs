use crate::domain_model::{ChatToken, ChatUserDescriptor};
use crate::domain_port::{ChatSessionError, ChatSessionProvider};
use crate::infra::peek_user_claims;
use crate::logger::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Stand-in for the chat SDK client.
///
/// Accepts a token only when its `user_id` claim names the connecting user,
/// which is what the hosted service checks first. `reject_all` simulates an
/// expired or revoked token.
#[derive(Debug, Default)]
pub struct FakeChatSession {
    connected: Mutex<Option<ChatUserDescriptor>>,
    reject_all: AtomicBool,
    fail_disconnect: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl FakeChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_all(&self, reject: bool) {
        self.reject_all.store(reject, Ordering::SeqCst);
    }

    pub fn fail_disconnect(&self, fail: bool) {
        self.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ChatSessionProvider for FakeChatSession {
    async fn connect_user(
        &self,
        user: &ChatUserDescriptor,
        token: &ChatToken,
    ) -> Result<(), ChatSessionError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.reject_all.load(Ordering::SeqCst) {
            return Err(ChatSessionError::Rejected("token expired".to_string()));
        }
        let claims = peek_user_claims(token)
            .map_err(|e| ChatSessionError::Rejected(format!("malformed token: {e}")))?;
        if claims.user_id != user.id.as_str() {
            return Err(ChatSessionError::Rejected(format!(
                "token was issued for {}",
                claims.user_id
            )));
        }
        let mut connected = self
            .connected
            .lock()
            .map_err(|_| ChatSessionError::Transport("connection state poisoned".to_string()))?;
        *connected = Some(user.clone());
        debug!(user_id = %user.id, "fake chat connected");
        Ok(())
    }

    async fn disconnect_user(&self) -> Result<(), ChatSessionError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(ChatSessionError::Transport("socket already closed".to_string()));
        }
        if let Ok(mut connected) = self.connected.lock() {
            connected.take();
        }
        Ok(())
    }

    async fn current_user(&self) -> Option<ChatUserDescriptor> {
        self.connected.lock().ok().and_then(|c| c.clone())
    }
}
