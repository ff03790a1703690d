#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::response::Response;
use axum::Router;
use http::{Method, Request};
use httpserver::config::{Config, LatencyConfig, MetricsConfig, PathLabel};
use httpserver::metrics::Metrics;
use httpserver::routes::create_router;
use httpserver::state::AppState;

/// Port the fake peer connects from; the resolver must strip it.
pub const PEER_PORT: u16 = 52000;

pub fn test_config() -> Config {
    Config {
        latency: LatencyConfig::disabled(),
        ..Config::default()
    }
}

pub fn route_label_config() -> Config {
    Config {
        metrics: MetricsConfig {
            path_label: PathLabel::Route,
        },
        ..test_config()
    }
}

/// Builds the router around a fresh registry and returns a handle to that registry.
pub fn build_app(config: Config) -> (Router, Metrics) {
    let metrics = Metrics::new().expect("metrics should register");
    let state = AppState::new(config, metrics.clone());
    (create_router(state), metrics)
}

pub fn build_request(path: &str, method: Method) -> Request<Body> {
    request_with_headers(path, method, &[])
}

pub fn request_with_headers(path: &str, method: Method, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let mut request = builder.body(Body::empty()).expect("failed to build request");

    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        PEER_PORT,
    )));

    request
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
