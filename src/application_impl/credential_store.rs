use crate::domain_model::{ChatToken, ChatUser, CredentialRecord, UserId};
use crate::domain_port::{KeyValueStore, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const USER_ID_KEY: &str = "@huddle-user-id";
pub const TOKEN_KEY: &str = "@huddle-token";
pub const API_KEY_KEY: &str = "@huddle-api-key";
pub const USER_DATA_KEY: &str = "@huddle-user-data";
pub const LOGGED_IN_KEY: &str = "@huddle-logged-in";

pub const CREDENTIAL_KEYS: [&str; 5] = [
    USER_ID_KEY,
    TOKEN_KEY,
    API_KEY_KEY,
    USER_DATA_KEY,
    LOGGED_IN_KEY,
];

/// Persists a [`CredentialRecord`] as five keys, written and removed together.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let entries = vec![
            entry(USER_ID_KEY, &record.user_id)?,
            entry(TOKEN_KEY, &record.token)?,
            entry(API_KEY_KEY, &record.api_key)?,
            entry(USER_DATA_KEY, &record.user_data)?,
            entry(LOGGED_IN_KEY, &record.is_logged_in)?,
        ];
        self.store.set_many(entries).await
    }

    pub async fn load(&self) -> Result<CredentialRecord, StoreError> {
        Ok(CredentialRecord {
            user_id: self.read::<UserId>(USER_ID_KEY).await?,
            token: self.read::<ChatToken>(TOKEN_KEY).await?,
            api_key: self.read::<String>(API_KEY_KEY).await?,
            user_data: self.read::<ChatUser>(USER_DATA_KEY).await?,
            is_logged_in: self.read::<bool>(LOGGED_IN_KEY).await?.unwrap_or(false),
        })
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove_many(&CREDENTIAL_KEYS).await
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.store
            .get(key)
            .await?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}

fn entry<T: Serialize>(key: &str, value: &T) -> Result<(String, Value), StoreError> {
    let value = serde_json::to_value(value).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok((key.to_string(), value))
}
