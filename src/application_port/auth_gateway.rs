use crate::domain_model::{ChatToken, InvalidUserId, LoginGrant, UserId};
use crate::domain_port::DirectoryError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    InvalidUserId(#[from] InvalidUserId),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("token error: {0}")]
    Token(String),
}

#[async_trait::async_trait]
pub trait TokenMinter: Send + Sync {
    /// Mint a chat session token for `user_id`. Every call yields a new token;
    /// earlier ones stay valid.
    async fn create_token(&self, user_id: &UserId) -> Result<ChatToken, GatewayError>;
}

/// Server side: turns a bare user identifier into a usable chat credential.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, user_id: &str) -> Result<LoginGrant, GatewayError>;
}
