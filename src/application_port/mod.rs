mod auth_gateway;
mod gateway_client;
mod session_service;

pub use auth_gateway::*;
pub use gateway_client::*;
pub use session_service::*;
