use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra::*;
use crate::infra_stream::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub auth_gateway: Arc<dyn AuthGateway>,
}

impl Server {
    pub fn new(auth_gateway: Arc<dyn AuthGateway>) -> Self {
        Self { auth_gateway }
    }

    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let chat = &settings.chat;
        if chat.api_key.is_empty() {
            return Err(anyhow::anyhow!("chat.api_key is not set"));
        }
        if chat.api_secret.is_empty() {
            return Err(anyhow::anyhow!("chat.api_secret is not set"));
        }

        let directory: Arc<dyn ChatUserDirectory> = match chat.backend.as_str() {
            "fake" => Arc::new(MemoryUserDirectory::new()),
            "real" => Arc::new(StreamUserDirectory::new(
                chat.base_url.clone(),
                chat.api_key.clone(),
                chat.api_secret.as_bytes(),
                Duration::from_secs(chat.timeout_secs),
            )?),
            other => return Err(anyhow::anyhow!("Unknown chat backend: {}", other)),
        };
        let token_minter: Arc<dyn TokenMinter> =
            Arc::new(JwtTokenMinter::new(chat.api_secret.as_bytes()));

        let auth_gateway: Arc<dyn AuthGateway> = Arc::new(RealAuthGateway::new(
            directory,
            token_minter,
            chat.api_key.clone(),
        ));

        info!(backend = %chat.backend, "server started");

        Ok(Self::new(auth_gateway))
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
    }
}
