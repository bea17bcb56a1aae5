mod auth_gateway_impl;
mod credential_store;
mod session_bootstrapper;

pub use auth_gateway_impl::*;
pub use credential_store::*;
pub use session_bootstrapper::*;
