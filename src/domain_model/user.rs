use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const PLACEHOLDER_IMAGE_BASE: &str = "https://getstream.io/random_png/";
const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("User ID is required")]
pub struct InvalidUserId;

/// A chat user identifier. Never empty; surrounding whitespace is dropped.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, InvalidUserId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidUserId);
        }
        Ok(UserId(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserId::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// A user record as the hosted chat backend stores it.
///
/// Fields this crate does not know about are kept in `extra`, so a record
/// fetched from the backend serializes back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

impl ChatUser {
    /// The record created for an identifier seen for the first time: the
    /// identifier doubles as display name and keys a generated avatar.
    pub fn placeholder(id: &UserId) -> Self {
        ChatUser {
            id: id.to_string(),
            name: Some(id.to_string()),
            image: Some(placeholder_image_url(id)),
            role: default_role(),
            extra: Map::new(),
        }
    }
}

pub fn placeholder_image_url(id: &UserId) -> String {
    format!("{PLACEHOLDER_IMAGE_BASE}?id={id}&name={id}")
}

/// What the chat client is handed when it opens a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUserDescriptor {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatUserDescriptor {
    pub fn new(id: UserId, user_data: Option<&ChatUser>) -> Self {
        let name = user_data
            .and_then(|user| user.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.to_string());
        let image = user_data.and_then(|user| user.image.clone());
        ChatUserDescriptor { id, name, image }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatToken(pub String);

impl fmt::Display for ChatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_id_rejects_blank_input() {
        assert_eq!(UserId::parse(""), Err(InvalidUserId));
        assert_eq!(UserId::parse("   \t\n"), Err(InvalidUserId));
    }

    #[test]
    fn user_id_trims_surrounding_whitespace() {
        let id = UserId::parse("  john_doe ").unwrap();
        assert_eq!(id.as_str(), "john_doe");
    }

    #[test]
    fn user_id_deserialization_validates() {
        assert!(serde_json::from_value::<UserId>(json!("  ")).is_err());
        let id: UserId = serde_json::from_value(json!("alice")).unwrap();
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn placeholder_uses_identifier_for_name_and_avatar() {
        let id = UserId::parse("john_doe").unwrap();
        let user = ChatUser::placeholder(&id);
        assert_eq!(user.id, "john_doe");
        assert_eq!(user.name.as_deref(), Some("john_doe"));
        assert_eq!(
            user.image.as_deref(),
            Some("https://getstream.io/random_png/?id=john_doe&name=john_doe")
        );
        assert_eq!(user.role, "user");
    }

    #[test]
    fn chat_user_keeps_unknown_fields() {
        let raw = json!({
            "id": "bob",
            "name": "Bob",
            "role": "admin",
            "created_at": "2024-01-01T00:00:00Z",
            "online": false
        });
        let user: ChatUser = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.extra.len(), 2);
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn descriptor_falls_back_to_id_without_a_name() {
        let id = UserId::parse("carol").unwrap();
        let descriptor = ChatUserDescriptor::new(id.clone(), None);
        assert_eq!(descriptor.name, "carol");
        assert_eq!(descriptor.image, None);

        let mut user = ChatUser::placeholder(&id);
        user.name = Some("Carol C.".to_string());
        let descriptor = ChatUserDescriptor::new(id, Some(&user));
        assert_eq!(descriptor.name, "Carol C.");
        assert!(descriptor.image.is_some());
    }
}
