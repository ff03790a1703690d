//! Header echo endpoint.

use http::header::{self, HeaderName};
use http::{HeaderMap, HeaderValue, request::Parts};
use tracing::warn;

use crate::config::DEFAULT_VERSION;
use crate::handler::{self, HttpHandle, Response};

pub const HEADERS_PATH: &str = "/headers";
pub const VERSION_HEADER: &str = "version";

/// Request headers that describe the inbound connection or message framing.
/// Echoing them would corrupt the response, so they are not copied.
const NOT_ECHOED: [HeaderName; 6] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
    header::UPGRADE,
    header::TE,
];

/// Builds the `/headers` handler: every request header echoed back, plus `version`.
pub fn headers(version: &str) -> HttpHandle {
    let version = HeaderValue::from_str(version).unwrap_or_else(|_| {
        warn!(
            version = %version,
            "Version is not a valid header value, reporting {}", DEFAULT_VERSION
        );
        HeaderValue::from_static(DEFAULT_VERSION)
    });

    handler::handle(move |request| echo_headers(request, &version))
}

fn echo_headers(request: &Parts, version: &HeaderValue) -> Response {
    let mut headers = HeaderMap::with_capacity(request.headers.len() + 1);
    for (name, value) in request.headers.iter() {
        if !NOT_ECHOED.contains(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers.insert(VERSION_HEADER, version.clone());
    Response::headers(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn parts(pairs: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(HEADERS_PATH);
        for (name, value) in pairs {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn echoes_request_headers_with_version() {
        let handle = headers("1.4.0");
        let response = handle(&parts(&[("Foo", "bar")]));

        assert_eq!(response.status, None);
        assert_eq!(response.headers.get("foo").unwrap(), "bar");
        assert_eq!(response.headers.get(VERSION_HEADER).unwrap(), "1.4.0");
    }

    #[test]
    fn keeps_every_value_of_repeated_headers() {
        let handle = headers(DEFAULT_VERSION);
        let response = handle(&parts(&[("Accept", "text/html"), ("Accept", "text/plain")]));

        let values: Vec<_> = response.headers.get_all("accept").iter().collect();
        assert_eq!(values, vec!["text/html", "text/plain"]);
    }

    #[test]
    fn inbound_version_header_is_replaced() {
        let handle = headers("0.1");
        let response = handle(&parts(&[("version", "9.9")]));

        let values: Vec<_> = response.headers.get_all(VERSION_HEADER).iter().collect();
        assert_eq!(values, vec!["0.1"]);
    }

    #[test]
    fn framing_headers_are_not_echoed() {
        let handle = headers("0.1");
        let response = handle(&parts(&[
            ("Host", "example.test"),
            ("Content-Length", "12"),
            ("Connection", "keep-alive"),
            ("User-Agent", "curl/8.0"),
        ]));

        assert!(response.headers.get(header::HOST).is_none());
        assert!(response.headers.get(header::CONTENT_LENGTH).is_none());
        assert!(response.headers.get(header::CONNECTION).is_none());
        assert_eq!(response.headers.get(header::USER_AGENT).unwrap(), "curl/8.0");
    }

    #[test]
    fn unusable_version_falls_back_to_default() {
        let handle = headers("bad\nversion");
        let response = handle(&parts(&[]));
        assert_eq!(response.headers.get(VERSION_HEADER).unwrap(), DEFAULT_VERSION);
    }
}
