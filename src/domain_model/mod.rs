mod credential;
mod session;
mod user;

pub use credential::*;
pub use session::*;
pub use user::*;
