// remote

mod chat_session;
mod user_directory;

pub use chat_session::*;
pub use user_directory::*;

// local

mod key_value_store;

pub use key_value_store::*;
