//! Global `tracing` subscriber with a reloadable filter, plus the macros
//! every other module logs through.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
