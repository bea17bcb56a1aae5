use super::error::*;
use crate::application_port::{AuthGateway, HealthReport};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: &ApiErrorCode) -> Self {
        ApiResponse {
            success: false,
            message: code.to_string(),
            data: None,
            error: code.detail(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

pub async fn login(
    body: LoginRequest,
    auth_gateway: Arc<dyn AuthGateway>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user_id = body.user_id.unwrap_or_default();
    let grant = auth_gateway
        .login(&user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok("Login successful", grant)))
}

pub async fn health() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&HealthReport {
        success: true,
        message: "Server is running".to_string(),
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Serialize)]
struct Endpoints {
    login: &'static str,
    health: &'static str,
}

#[derive(Debug, Serialize)]
struct IndexResponse {
    success: bool,
    message: &'static str,
    endpoints: Endpoints,
}

pub async fn index() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&IndexResponse {
        success: true,
        message: "Huddle auth gateway",
        endpoints: Endpoints {
            login: "POST /api/login",
            health: "GET /api/health",
        },
    }))
}
