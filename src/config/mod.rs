// Re-exports so callers can `use crate::config::*`.
pub mod config;
pub mod logging;
pub mod middleware;

pub use config::*;
pub use logging::*;
pub use middleware::*;
