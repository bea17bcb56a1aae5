use crate::domain_model::{ChatUser, UserId};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("chat backend unreachable: {0}")]
    Transport(String),
    #[error("chat backend responded with {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected chat backend response: {0}")]
    Decode(String),
    #[error("cannot sign chat backend request: {0}")]
    Signing(String),
}

/// The hosted chat backend's user directory. Records are owned by the
/// backend; callers never cache them.
#[async_trait::async_trait]
pub trait ChatUserDirectory: Send + Sync {
    async fn query_user(&self, id: &UserId) -> Result<Option<ChatUser>, DirectoryError>;
    /// Create or replace the record and return it as the backend stored it.
    async fn upsert_user(&self, user: &ChatUser) -> Result<ChatUser, DirectoryError>;
}
