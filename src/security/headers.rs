//! Header filtering for forwarded requests and relayed responses.
//!
//! # Responsibilities
//! - Strip transport-scoped headers before forwarding
//! - Default the outbound Content-Type for body-carrying methods
//! - Drop transport-scoped and CORS headers from upstream responses
//!
//! # Design Decisions
//! - Request side is a denylist: everything else is forwarded, including
//!   Authorization and cookies, since the upstreams make auth decisions
//! - Response side is a denylist too: downloads, pagination and retry hints
//!   reach the client unchanged
//! - CORS headers are never relayed; the gateway policy owns them

use axum::http::{header, HeaderMap, HeaderValue, Method};

/// Headers never copied from the inbound request.
///
/// `transfer-encoding` joins the list because the body is buffered and
/// re-framed by the outbound client.
pub const STRIPPED_REQUEST_HEADERS: &[&str] = &[
    "host",
    "connection",
    "content-length",
    "transfer-encoding",
];

/// Upstream response headers never relayed.
///
/// The response is re-framed from a buffered body, so length and framing
/// headers are recomputed by the server.
pub const STRIPPED_RESPONSE_HEADERS: &[&str] = &[
    "connection",
    "content-length",
    "keep-alive",
    "proxy-authenticate",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const CORS_HEADER_PREFIX: &str = "access-control-";

/// Content-Type used when none is declared or the upstream omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Whether the method carries a forwarded body.
pub fn method_has_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Copy inbound headers minus the stripped set, preserving repeated values.
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        // HeaderName is always lowercase
        if STRIPPED_REQUEST_HEADERS.contains(&name.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Insert `application/json` when a body-carrying request has no Content-Type.
pub fn ensure_content_type(headers: &mut HeaderMap, method: &Method) {
    if method_has_body(method) && !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }
}

/// Declared Content-Type, lowercased, if present and readable.
pub fn declared_content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
}

/// Build the client-facing header set from an upstream response.
pub fn relayed_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    let content_type = upstream
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    out.insert(header::CONTENT_TYPE, content_type);

    for (name, value) in upstream.iter() {
        let name_str = name.as_str();
        if name == header::CONTENT_TYPE
            || STRIPPED_RESPONSE_HEADERS.contains(&name_str)
            || name_str.starts_with(CORS_HEADER_PREFIX)
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_headers_are_stripped() {
        let mut inbound = HeaderMap::new();
        inbound.insert("host", HeaderValue::from_static("console.example.com"));
        inbound.insert("connection", HeaderValue::from_static("keep-alive"));
        inbound.insert("content-length", HeaderValue::from_static("42"));
        inbound.insert("authorization", HeaderValue::from_static("Bearer abc"));
        inbound.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));

        let out = forwardable_headers(&inbound);
        assert!(!out.contains_key("host"));
        assert!(!out.contains_key("connection"));
        assert!(!out.contains_key("content-length"));
        assert_eq!(out.get("authorization").unwrap(), "Bearer abc");
        assert_eq!(out.get("x-requested-with").unwrap(), "XMLHttpRequest");
    }

    #[test]
    fn test_repeated_values_keep_order() {
        let mut inbound = HeaderMap::new();
        inbound.append("accept-language", HeaderValue::from_static("en"));
        inbound.append("accept-language", HeaderValue::from_static("fr"));

        let out = forwardable_headers(&inbound);
        let values: Vec<_> = out.get_all("accept-language").iter().collect();
        assert_eq!(values, vec!["en", "fr"]);
    }

    #[test]
    fn test_default_content_type_only_for_body_methods() {
        let mut headers = HeaderMap::new();
        ensure_content_type(&mut headers, &Method::GET);
        assert!(headers.get(header::CONTENT_TYPE).is_none());

        ensure_content_type(&mut headers, &Method::PATCH);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        ensure_content_type(&mut headers, &Method::POST);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_relayed_headers_default_and_denylist() {
        let mut upstream = HeaderMap::new();
        upstream.insert("server", HeaderValue::from_static("gunicorn"));
        upstream.insert("x-total-count", HeaderValue::from_static("42"));
        upstream.insert("retry-after", HeaderValue::from_static("5"));
        upstream.insert("access-control-allow-origin", HeaderValue::from_static("https://x"));
        upstream.insert("access-control-max-age", HeaderValue::from_static("10"));
        upstream.insert("content-length", HeaderValue::from_static("99"));
        upstream.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        upstream.insert("connection", HeaderValue::from_static("close"));
        upstream.append("set-cookie", HeaderValue::from_static("a=1"));
        upstream.append("set-cookie", HeaderValue::from_static("b=2"));

        let out = relayed_headers(&upstream);
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(out.get("server").unwrap(), "gunicorn");
        assert_eq!(out.get("x-total-count").unwrap(), "42");
        assert_eq!(out.get("retry-after").unwrap(), "5");
        assert!(out.get("access-control-allow-origin").is_none());
        assert!(out.get("access-control-max-age").is_none());
        assert!(out.get("content-length").is_none());
        assert!(out.get("transfer-encoding").is_none());
        assert!(out.get("connection").is_none());
        assert_eq!(out.get_all("set-cookie").iter().count(), 2);
    }

    #[test]
    fn test_relayed_content_type_kept() {
        let mut upstream = HeaderMap::new();
        upstream.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
        let out = relayed_headers(&upstream);
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "text/csv");
        assert_eq!(out.get_all(header::CONTENT_TYPE).iter().count(), 1);
    }
}
