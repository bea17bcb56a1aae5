use crate::domain_model::*;
use serde::{Deserialize, Serialize};

/// What the auth gateway hands back for a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    pub user_id: UserId,
    pub token: ChatToken,
    pub api_key: String,
    pub user: ChatUser,
}

/// The locally persisted login. Every field is optional because each one is
/// read from its own storage key and any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialRecord {
    pub user_id: Option<UserId>,
    pub token: Option<ChatToken>,
    pub api_key: Option<String>,
    pub user_data: Option<ChatUser>,
    pub is_logged_in: bool,
}

impl CredentialRecord {
    /// The id and token to reconnect with, when the record is complete enough.
    pub fn restorable(&self) -> Option<(&UserId, &ChatToken)> {
        if !self.is_logged_in {
            return None;
        }
        match (&self.user_id, &self.token) {
            (Some(user_id), Some(token)) => Some((user_id, token)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.token.is_none()
            && self.api_key.is_none()
            && self.user_data.is_none()
            && !self.is_logged_in
    }
}

impl From<&LoginGrant> for CredentialRecord {
    fn from(grant: &LoginGrant) -> Self {
        CredentialRecord {
            user_id: Some(grant.user_id.clone()),
            token: Some(grant.token.clone()),
            api_key: Some(grant.api_key.clone()),
            user_data: Some(grant.user.clone()),
            is_logged_in: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grant() -> LoginGrant {
        let user_id = UserId::parse("dave").unwrap();
        LoginGrant {
            user: ChatUser::placeholder(&user_id),
            user_id,
            token: ChatToken("tok".to_string()),
            api_key: "key".to_string(),
        }
    }

    #[test]
    fn grant_uses_camel_case_on_the_wire() {
        let value = serde_json::to_value(grant()).unwrap();
        assert_eq!(value["userId"], json!("dave"));
        assert_eq!(value["apiKey"], json!("key"));
        assert_eq!(value["token"], json!("tok"));
        assert_eq!(value["user"]["name"], json!("dave"));
    }

    #[test]
    fn record_from_grant_is_restorable() {
        let record = CredentialRecord::from(&grant());
        let (user_id, token) = record.restorable().unwrap();
        assert_eq!(user_id.as_str(), "dave");
        assert_eq!(token.0, "tok");
        assert!(!record.is_empty());
    }

    #[test]
    fn partial_record_is_not_restorable() {
        let mut record = CredentialRecord::from(&grant());
        record.token = None;
        assert!(record.restorable().is_none());

        let mut record = CredentialRecord::from(&grant());
        record.is_logged_in = false;
        assert!(record.restorable().is_none());

        assert!(CredentialRecord::default().is_empty());
    }
}
