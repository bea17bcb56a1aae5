use crate::application_port::{GatewayError, TokenMinter};
use crate::domain_model::{ChatToken, UserId};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims of a user token, in the shape the hosted chat backend expects.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: String,
    pub iat: i64,
    pub jti: String,
}

/// Mints HS256 user tokens signed with the chat backend's api secret.
pub struct JwtTokenMinter {
    signing_key: EncodingKey,
}

impl JwtTokenMinter {
    pub fn new(api_secret: &[u8]) -> Self {
        JwtTokenMinter {
            signing_key: EncodingKey::from_secret(api_secret),
        }
    }
}

#[async_trait::async_trait]
impl TokenMinter for JwtTokenMinter {
    async fn create_token(&self, user_id: &UserId) -> Result<ChatToken, GatewayError> {
        let claims = UserClaims {
            user_id: user_id.to_string(),
            iat: Utc::now().timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.signing_key)
            .map_err(|e| GatewayError::Token(e.to_string()))?;
        Ok(ChatToken(token))
    }
}

/// Read the claims of a user token without checking its signature. Only the
/// backend holding the secret can verify; clients just inspect.
pub fn peek_user_claims(token: &ChatToken) -> Result<UserClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    let data = decode::<UserClaims>(&token.0, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}
