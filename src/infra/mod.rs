mod chat_session_fake;
mod gateway_client_http;
mod key_value_store_file;
mod key_value_store_memory;
mod token_minter_jwt;
mod user_directory_memory;

pub use chat_session_fake::*;
pub use gateway_client_http::*;
pub use key_value_store_file::*;
pub use key_value_store_memory::*;
pub use token_minter_jwt::*;
pub use user_directory_memory::*;
