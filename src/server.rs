//! Route table with exact-path dispatch.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::routing::any;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::HttpHandle;
use crate::middleware::{handle_request, RouteContext};
use crate::routes::metrics;
use crate::state::AppState;

/// Collects routes before the state is attached.
///
/// Every route added with [`Server::route`] runs behind the request middleware and
/// answers any method on its exact path. `/metrics` is always registered.
pub struct Server {
    router: Router<AppState>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    pub fn new() -> Self {
        Server {
            router: Router::new().merge(metrics::routes()),
        }
    }

    /// Registers `handle` for requests whose path is exactly `path`.
    pub fn route(mut self, path: &str, handle: HttpHandle) -> Self {
        let route: Arc<str> = Arc::from(path);

        let wrapped = move |State(state): State<AppState>,
                            connect_info: Option<ConnectInfo<SocketAddr>>,
                            req: Request| {
            let route = route.clone();
            let handle = handle.clone();
            async move {
                let ctx = RouteContext {
                    route: &route,
                    handle: &handle,
                    config: &state.config,
                    metrics: &state.metrics,
                };
                handle_request(ctx, connect_info.map(|ConnectInfo(addr)| addr), req).await
            }
        };

        self.router = self.router.route(path, any(wrapped));
        self
    }

    /// Attaches the state and the panic guard.
    pub fn into_router(self, state: AppState) -> Router {
        self.router
            .layer(CatchPanicLayer::new())
            .with_state(state)
    }
}
