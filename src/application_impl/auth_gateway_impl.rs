use crate::application_port::{AuthGateway, GatewayError, TokenMinter};
use crate::domain_model::{ChatUser, LoginGrant, UserId};
use crate::domain_port::ChatUserDirectory;
use crate::logger::*;
use std::sync::Arc;

pub struct RealAuthGateway {
    directory: Arc<dyn ChatUserDirectory>,
    token_minter: Arc<dyn TokenMinter>,
    api_key: String,
}

impl RealAuthGateway {
    pub fn new(
        directory: Arc<dyn ChatUserDirectory>,
        token_minter: Arc<dyn TokenMinter>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            token_minter,
            api_key: api_key.into(),
        }
    }

    /// Find-or-create. Two first logins racing on the same id may both
    /// create; the backend's upsert keeps that harmless.
    async fn ensure_user(&self, user_id: &UserId) -> Result<ChatUser, GatewayError> {
        if let Some(user) = self.directory.query_user(user_id).await? {
            info!(%user_id, "user found");
            return Ok(user);
        }
        let user = self
            .directory
            .upsert_user(&ChatUser::placeholder(user_id))
            .await?;
        info!(%user_id, "created new user");
        Ok(user)
    }
}

#[async_trait::async_trait]
impl AuthGateway for RealAuthGateway {
    async fn login(&self, user_id: &str) -> Result<LoginGrant, GatewayError> {
        let user_id = UserId::parse(user_id)?;
        let user = self.ensure_user(&user_id).await?;
        let token = self.token_minter.create_token(&user_id).await?;
        Ok(LoginGrant {
            user_id,
            token,
            api_key: self.api_key.clone(),
            user,
        })
    }
}
