//! The per-route request wrapper: client IP, timing, logging and metrics.

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response as HttpResponse;
use http::{HeaderValue, header};
use tracing::info;

use super::latency::inject_latency;
use crate::config::{Config, PathLabel};
use crate::handler::{HttpHandle, Response};
use crate::metrics::MetricsRecorder;
use crate::utils::client_ip::resolve_client_ip;

/// Everything the wrapper needs to know about the route it runs for.
pub struct RouteContext<'a, M: MetricsRecorder> {
    /// Registered path, used as the `path` label in `route` mode.
    pub route: &'a str,
    pub handle: &'a HttpHandle,
    pub config: &'a Config,
    pub metrics: &'a M,
}

/// Runs `ctx.handle` for `req` and turns its [`Response`] into an HTTP response.
///
/// Emits `request_in` before the handler and `request_out` after it, then counts
/// the request and records its duration. A panicking handler skips all of the
/// after-work; the panic is left to the outer layers.
pub async fn handle_request<M: MetricsRecorder>(
    ctx: RouteContext<'_, M>,
    remote_addr: Option<SocketAddr>,
    req: Request,
) -> HttpResponse {
    let begin = Instant::now();
    inject_latency(&ctx.config.latency).await;

    let (parts, _body) = req.into_parts();
    let client_ip = resolve_client_ip(&parts.headers, remote_addr);
    let uri = parts.uri.to_string();

    info!(client_ip = %client_ip, uri = %uri, "request_in");

    let response = (ctx.handle)(&parts);
    let status = response.status_or_ok();
    let duration = begin.elapsed().as_secs_f64();

    let out = into_http_response(response);

    info!(
        client_ip = %client_ip,
        uri = %uri,
        code = status.as_u16(),
        proc_time = duration,
        "request_out"
    );

    let method = parts.method.as_str();
    let path = match ctx.config.metrics.path_label {
        PathLabel::Uri => uri.as_str(),
        PathLabel::Route => ctx.route,
    };
    ctx.metrics.record_request(method, path, status.as_u16());
    ctx.metrics.record_request_duration(method, path, duration);

    out
}

/// Copies status, every header value and the body onto an outgoing response.
pub fn into_http_response(response: Response) -> HttpResponse {
    let status = response.status_or_ok();
    let has_body = !response.body.is_empty();
    let mut out = HttpResponse::new(Body::from(response.body));
    *out.status_mut() = status;

    let headers = out.headers_mut();
    for (name, value) in response.headers.iter() {
        headers.append(name.clone(), value.clone());
    }
    if has_body && !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LatencyConfig, MetricsConfig};
    use crate::handler;
    use http::{HeaderMap, Method, StatusCode};
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingMetrics {
        requests: Arc<Mutex<Vec<(String, String, u16)>>>,
        durations: Arc<Mutex<Vec<(String, String, f64)>>>,
    }

    impl MetricsRecorder for RecordingMetrics {
        fn record_request(&self, method: &str, path: &str, status: u16) {
            self.requests
                .lock()
                .unwrap()
                .push((method.to_string(), path.to_string(), status));
        }

        fn record_request_duration(&self, method: &str, path: &str, duration_secs: f64) {
            self.durations
                .lock()
                .unwrap()
                .push((method.to_string(), path.to_string(), duration_secs));
        }
    }

    fn config(path_label: PathLabel) -> Config {
        Config {
            latency: LatencyConfig::disabled(),
            metrics: MetricsConfig { path_label },
            ..Config::default()
        }
    }

    fn request(method: Method, uri: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn peer() -> Option<SocketAddr> {
        Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40000))
    }

    #[test]
    fn unset_status_becomes_ok() {
        let out = into_http_response(Response::body("ok"));
        assert_eq!(out.status(), StatusCode::OK);
    }

    #[test]
    fn explicit_status_is_kept() {
        let out = into_http_response(Response::default().with_status(StatusCode::ACCEPTED));
        assert_eq!(out.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn multi_value_headers_are_appended() {
        let mut headers = HeaderMap::new();
        headers.append("x-multi", HeaderValue::from_static("one"));
        headers.append("x-multi", HeaderValue::from_static("two"));
        let out = into_http_response(Response::headers(headers));

        let values: Vec<_> = out
            .headers()
            .get_all("x-multi")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["one", "two"]);
    }

    #[test]
    fn plain_text_content_type_is_defaulted_for_bodies() {
        let out = into_http_response(Response::body("ok"));
        assert_eq!(
            out.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );

        let empty = into_http_response(Response::default());
        assert!(empty.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn records_one_sample_with_uri_labels() {
        let metrics = RecordingMetrics::default();
        let config = config(PathLabel::Uri);
        let handle = handler::handle(|_| Response::body("ok"));
        let ctx = RouteContext {
            route: "/healthz",
            handle: &handle,
            config: &config,
            metrics: &metrics,
        };

        let out = handle_request(ctx, peer(), request(Method::POST, "/healthz?check=1")).await;
        assert_eq!(out.status(), StatusCode::OK);

        let requests = metrics.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![("POST".to_string(), "/healthz?check=1".to_string(), 200)]
        );
        let durations = metrics.durations.lock().unwrap();
        assert_eq!(durations.len(), 1);
        assert_eq!(durations[0].1, "/healthz?check=1");
        assert!(durations[0].2 >= 0.0);
    }

    #[tokio::test]
    async fn route_mode_labels_with_registered_path() {
        let metrics = RecordingMetrics::default();
        let config = config(PathLabel::Route);
        let handle = handler::handle(|_| Response::default().with_status(StatusCode::NO_CONTENT));
        let ctx = RouteContext {
            route: "/headers",
            handle: &handle,
            config: &config,
            metrics: &metrics,
        };

        handle_request(ctx, peer(), request(Method::GET, "/headers?a=1&b=2")).await;

        let requests = metrics.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![("GET".to_string(), "/headers".to_string(), 204)]
        );
    }

    #[tokio::test]
    async fn handler_sees_request_head() {
        let metrics = RecordingMetrics::default();
        let config = config(PathLabel::Uri);
        let handle = handler::handle(|parts| Response::body(parts.method.as_str()));
        let ctx = RouteContext {
            route: "/echo",
            handle: &handle,
            config: &config,
            metrics: &metrics,
        };

        let out = handle_request(ctx, None, request(Method::PUT, "/echo")).await;
        let body = axum::body::to_bytes(out.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"PUT");
    }
}
