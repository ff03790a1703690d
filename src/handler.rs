//! The value a route handler produces, and the handler function type.
//!
//! Handlers are plain functions of the request head. Everything else a request
//! needs (timing, logging, metrics, writing to the transport) is applied by
//! [`crate::middleware`].

use std::sync::Arc;

use http::{HeaderMap, StatusCode, request::Parts};

/// A handler's response, consumed once by the middleware.
#[derive(Debug, Default, Clone)]
pub struct Response {
    /// `None` means "not set"; the middleware answers 200 OK.
    pub status: Option<StatusCode>,
    /// Multi-valued headers; every value is appended to the outgoing response.
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    /// A response with only a body; status defaults to 200 OK.
    pub fn body(body: impl Into<String>) -> Self {
        Response {
            body: body.into(),
            ..Default::default()
        }
    }

    /// A response with only headers.
    pub fn headers(headers: HeaderMap) -> Self {
        Response {
            headers,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// The status to write, substituting 200 OK for an unset one.
    pub fn status_or_ok(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }
}

/// A route handler, shared by every request dispatched to its path.
pub type HttpHandle = Arc<dyn Fn(&Parts) -> Response + Send + Sync>;

/// Boxes a handler function.
pub fn handle<F>(f: F) -> HttpHandle
where
    F: Fn(&Parts) -> Response + Send + Sync + 'static,
{
    Arc::new(f)
}
