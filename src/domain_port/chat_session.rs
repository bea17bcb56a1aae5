use crate::domain_model::{ChatToken, ChatUserDescriptor};

#[derive(Debug, thiserror::Error)]
pub enum ChatSessionError {
    #[error("chat service rejected the connection: {0}")]
    Rejected(String),
    #[error("chat service unreachable: {0}")]
    Transport(String),
}

/// The client side of the chat service. Message delivery, presence and
/// reconnects after the initial connect all happen behind this seam.
#[async_trait::async_trait]
pub trait ChatSessionProvider: Send + Sync {
    async fn connect_user(
        &self,
        user: &ChatUserDescriptor,
        token: &ChatToken,
    ) -> Result<(), ChatSessionError>;
    async fn disconnect_user(&self) -> Result<(), ChatSessionError>;
    async fn current_user(&self) -> Option<ChatUserDescriptor>;
}
