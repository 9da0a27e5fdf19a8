//! API request handlers.

mod providers;
mod runs;

pub use providers::*;
pub use runs::*;
