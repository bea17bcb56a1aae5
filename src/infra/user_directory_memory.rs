use crate::domain_model::{ChatUser, UserId};
use crate::domain_port::{ChatUserDirectory, DirectoryError};
use dashmap::DashMap;

/// Process-local stand-in for the hosted user directory.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: DashMap<String, ChatUser>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = ChatUser>) -> Self {
        let directory = Self::new();
        for user in users {
            directory.users.insert(user.id.clone(), user);
        }
        directory
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl ChatUserDirectory for MemoryUserDirectory {
    async fn query_user(&self, id: &UserId) -> Result<Option<ChatUser>, DirectoryError> {
        Ok(self.users.get(id.as_str()).map(|entry| entry.value().clone()))
    }

    async fn upsert_user(&self, user: &ChatUser) -> Result<ChatUser, DirectoryError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }
}
