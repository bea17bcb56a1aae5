use crate::application_port::{GatewayClient, GatewayClientError, HealthReport};
use crate::domain_model::{LoginGrant, UserId};
use crate::logger::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const LOGIN_FAILED: &str = "Login failed";

/// Response envelope shared by every gateway endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpGatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayClientError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<(u16, Result<T, String>), GatewayClientError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| GatewayClientError::Transport(e.to_string()))?;
    Ok((status, serde_json::from_str(&text).map_err(|_| text)))
}

#[async_trait::async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn login(&self, user_id: &UserId) -> Result<LoginGrant, GatewayClientError> {
        let response = self
            .http
            .post(self.url("/api/login"))
            .json(&serde_json::json!({ "userId": user_id }))
            .send()
            .await
            .map_err(|e| GatewayClientError::Transport(e.to_string()))?;

        let (status, body) = read_json::<Envelope<LoginGrant>>(response).await?;
        let envelope = match body {
            Ok(envelope) => envelope,
            Err(text) if (200..300).contains(&status) => {
                return Err(GatewayClientError::Decode(text));
            }
            Err(text) => {
                debug!(status, "gateway refused login without an envelope");
                return Err(GatewayClientError::Rejected {
                    status,
                    message: LOGIN_FAILED.to_string(),
                    detail: Some(text).filter(|body| !body.trim().is_empty()),
                });
            }
        };

        if !(200..300).contains(&status) || !envelope.success {
            debug!(status, ?envelope.error, "gateway refused login");
            return Err(GatewayClientError::Rejected {
                status,
                message: envelope.message.unwrap_or_else(|| LOGIN_FAILED.to_string()),
                detail: envelope.error,
            });
        }

        envelope
            .data
            .ok_or_else(|| GatewayClientError::Decode("login response carries no data".to_string()))
    }

    async fn check_health(&self) -> Result<HealthReport, GatewayClientError> {
        let response = self
            .http
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| GatewayClientError::Transport(e.to_string()))?;

        match read_json::<HealthReport>(response).await? {
            (status, Ok(report)) if (200..300).contains(&status) => Ok(report),
            (status, Ok(report)) => Err(GatewayClientError::Rejected {
                status,
                message: report.message,
                detail: None,
            }),
            (_, Err(text)) => Err(GatewayClientError::Decode(text)),
        }
    }
}
