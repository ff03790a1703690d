//! Shared application state.
//!
//! Holds what every request handler and the middleware need: the loaded
//! configuration and the metrics registry.

use crate::config::Config;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; both fields are cheap reference-counted handles.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<Config>,
    /// Request counter and duration histogram, created once at startup.
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config, metrics: Metrics) -> Self {
        AppState {
            config: Arc::new(config),
            metrics,
        }
    }
}
