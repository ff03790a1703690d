//! Application startup and server initialization.
//!
//! Builds the metrics registry and the router, binds the listening socket and
//! serves until the accept loop fails.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::error::ServerError;
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// The metrics registry is created here, once per process, and handed to the
/// router through [`AppState`].
///
/// # Errors
///
/// Returns an error if the server fails to bind to the configured address
/// or the accept loop exits with an I/O error. There is no graceful shutdown.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let metrics = Metrics::new()?;
    let bind_address = config.bind_address.clone();
    let state = AppState::new(config, metrics);

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| ServerError::Bind {
            address: bind_address.clone(),
            source,
        })?;

    info!("start http server on {}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(ServerError::Serve)
}
