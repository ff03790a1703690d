//! Health check endpoint.

use http::request::Parts;

use crate::handler::Response;

pub const HEALTHZ_PATH: &str = "/healthz";

/// Always answers 200 with body `ok`, whatever the request carries.
pub fn healthz(_request: &Parts) -> Response {
    Response::body("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    #[test]
    fn healthz_ignores_request_headers() {
        let (parts, _) = Request::builder()
            .uri(HEALTHZ_PATH)
            .header("X-Real-IP", "203.0.113.5")
            .header("Accept", "application/json")
            .body(())
            .unwrap()
            .into_parts();

        let response = healthz(&parts);
        assert_eq!(response.status, None);
        assert_eq!(response.body, "ok");
        assert!(response.headers.is_empty());
    }
}
