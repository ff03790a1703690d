//! HTTP route definitions and handlers.
//!
//! Two informational routes run behind the request middleware; `/metrics`
//! is served directly.

pub mod header_routes;
pub mod health_routes;
pub mod metrics;

use crate::handler;
use crate::server::Server;
use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    let version = state.config.app_version().to_string();

    Server::new()
        .route(health_routes::HEALTHZ_PATH, handler::handle(health_routes::healthz))
        .route(header_routes::HEADERS_PATH, header_routes::headers(&version))
        .into_router(state)
}
