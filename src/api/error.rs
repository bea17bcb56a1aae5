use crate::api::handler::ApiResponse;
use crate::application_port::*;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        ApiErrorCode::InvalidBody(e.to_string())
    } else if err.find::<reject::UnsupportedMediaType>().is_some() {
        ApiErrorCode::InvalidBody("expected an application/json body".to_string())
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        ApiErrorCode::PayloadTooLarge
    } else if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::MethodNotAllowed
    } else {
        ApiErrorCode::internal(format!("Unhandled error: {:?}", err))
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(&code));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Clone, Error)]
pub enum ApiErrorCode {
    #[error("User ID is required")]
    UserIdRequired,
    #[error("Invalid request body")]
    InvalidBody(String),
    #[error("Request body too large")]
    PayloadTooLarge,
    #[error("Login failed")]
    LoginFailed(String),
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError(String),
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError(error.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::UserIdRequired | ApiErrorCode::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::LoginFailed(_) | ApiErrorCode::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Underlying cause, passed through to the caller as `error`.
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiErrorCode::InvalidBody(detail)
            | ApiErrorCode::LoginFailed(detail)
            | ApiErrorCode::InternalError(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<GatewayError> for ApiErrorCode {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::InvalidUserId(_) => ApiErrorCode::UserIdRequired,
            e @ (GatewayError::Directory(_) | GatewayError::Token(_)) => {
                warn!("Login error: {}", e);
                ApiErrorCode::LoginFailed(e.to_string())
            }
        }
    }
}
