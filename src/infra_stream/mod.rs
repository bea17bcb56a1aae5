mod user_directory_stream;

pub use user_directory_stream::*;
