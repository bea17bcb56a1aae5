use crate::domain_model::{LoginGrant, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum GatewayClientError {
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        detail: Option<String>,
    },
    #[error("auth gateway unreachable: {0}")]
    Transport(String),
    #[error("unexpected auth gateway response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Client side view of the auth gateway.
#[async_trait::async_trait]
pub trait GatewayClient: Send + Sync {
    async fn login(&self, user_id: &UserId) -> Result<LoginGrant, GatewayClientError>;
    async fn check_health(&self) -> Result<HealthReport, GatewayClientError>;
}
