use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(String),
    #[error("stored value under {key} is unreadable: {reason}")]
    Corrupt { key: String, reason: String },
}

/// String-keyed storage of JSON values on the local device.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    /// Write every entry or none of them.
    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError>;
    /// Remove every key or none of them. Absent keys are not an error.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError>;
}
