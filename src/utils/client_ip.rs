//! Best-effort client IP resolution.
//!
//! Lookup order: `X-Real-IP`, then the first entry of `X-Forwarded-For`, then the
//! transport peer address. A header candidate that is not a valid IP address is
//! dropped in favour of the peer address; it is never reported as an error.

use std::net::{IpAddr, SocketAddr};

use http::{HeaderMap, HeaderValue};

pub const X_REAL_IP: &str = "x-real-ip";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolves the client IP from proxy headers, falling back to `remote_addr`.
///
/// Returns an empty string only when no peer address is known and no header
/// candidate is valid.
pub fn resolve_client_ip(headers: &HeaderMap, remote_addr: Option<SocketAddr>) -> String {
    if let Some(candidate) = header_candidate(headers) {
        if candidate.parse::<IpAddr>().is_ok() {
            return candidate.to_string();
        }
    }

    remote_addr.map(|addr| addr.ip().to_string()).unwrap_or_default()
}

/// The value of the first non-empty proxy header, in priority order.
/// Values that are not valid text come back empty and fail validation.
fn header_candidate(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = non_empty(headers, X_REAL_IP) {
        return Some(value.to_str().unwrap_or_default().trim());
    }

    non_empty(headers, X_FORWARDED_FOR).map(|value| {
        let list = value.to_str().unwrap_or_default();
        list.split(',').next().unwrap_or_default().trim()
    })
}

fn non_empty<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a HeaderValue> {
    headers.get(name).filter(|value| !value.is_empty())
}
