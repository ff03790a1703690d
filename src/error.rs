//! Error type shared by configuration loading, startup and the metrics registry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid logging.level '{0}'. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Could not bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server exited: {0}")]
    Serve(#[source] std::io::Error),
}

impl From<figment::Error> for ServerError {
    fn from(err: figment::Error) -> Self {
        ServerError::Config(Box::new(err))
    }
}
