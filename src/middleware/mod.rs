//! Cross-cutting request handling applied uniformly to every route.

mod latency;
mod request;

pub use latency::{inject_latency, pick_delay};
pub use request::{handle_request, into_http_response, RouteContext};
