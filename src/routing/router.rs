//! Route resolution.
//!
//! # Responsibilities
//! - Strip the gateway mount prefix from the inbound path
//! - Classify the remainder and pick the upstream base URL
//! - Rebuild the forwarded path, normalizing the login route
//! - Compose the full upstream URL with the verbatim query string
//!
//! # Design Decisions
//! - Stateless: every input, including the upstream URLs, is a parameter
//! - `auth/login` is rewritten to `auth/login/` because the auth service
//!   only serves the trailing-slash form
//! - The query string is forwarded as received, never re-encoded

use crate::config::UpstreamConfig;
use crate::routing::matcher::{classify_with_rule, split_segments, MatchedRule, Upstream};

/// Forwarded path of the login route before normalization.
pub const LOGIN_PATH: &str = "auth/login";

/// Forwarded path of the login route as the auth service expects it.
pub const NORMALIZED_LOGIN_PATH: &str = "auth/login/";

/// A resolved forwarding target for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<'a> {
    /// Which upstream owns the path.
    pub upstream: Upstream,
    /// Rule that chose the upstream.
    pub rule: MatchedRule,
    /// Base URL of the chosen upstream.
    pub base_url: &'a str,
    /// Path appended to the base URL, without a leading slash.
    pub path: String,
}

impl Route<'_> {
    /// True when this is the auth service login endpoint.
    pub fn is_login(&self) -> bool {
        self.path == NORMALIZED_LOGIN_PATH
    }

    /// Build `{base}/{path}{?query}`.
    pub fn upstream_url(&self, query: Option<&str>) -> String {
        let mut url = format!("{}/{}", self.base_url.trim_end_matches('/'), self.path);
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(q);
        }
        url
    }
}

/// Remove the mount prefix from an inbound path.
///
/// Returns `None` when the path is not under the prefix. `/gatewayx` is
/// not under `/gateway`.
pub fn strip_mount_prefix<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Rejoin segments, applying the login trailing-slash rule.
pub fn forwarded_path(segments: &[&str]) -> String {
    let joined = segments.join("/");
    if joined == LOGIN_PATH {
        NORMALIZED_LOGIN_PATH.to_string()
    } else {
        joined
    }
}

/// Resolve the path remaining after the mount prefix into a route.
pub fn resolve<'a>(upstreams: &'a UpstreamConfig, remainder: &str) -> Route<'a> {
    let segments = split_segments(remainder);
    let (upstream, rule) = classify_with_rule(&segments);
    let base_url = match upstream {
        Upstream::Auth => upstreams.auth_url.as_str(),
        Upstream::Core => upstreams.core_url.as_str(),
    };

    Route {
        upstream,
        rule,
        base_url,
        path: forwarded_path(&segments),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstreams() -> UpstreamConfig {
        UpstreamConfig {
            auth_url: "http://auth.svc:8000".into(),
            core_url: "http://core.svc:8001/".into(),
        }
    }

    #[test]
    fn test_strip_mount_prefix() {
        assert_eq!(strip_mount_prefix("/gateway/products", "/gateway"), Some("/products"));
        assert_eq!(strip_mount_prefix("/gateway", "/gateway"), Some(""));
        assert_eq!(strip_mount_prefix("/gatewayx/products", "/gateway"), None);
        assert_eq!(strip_mount_prefix("/other/products", "/gateway"), None);
    }

    #[test]
    fn test_login_forms_resolve_identically() {
        let ups = upstreams();
        let a = resolve(&ups, "/auth/login");
        let b = resolve(&ups, "/auth/login/");
        assert_eq!(a.path, NORMALIZED_LOGIN_PATH);
        assert_eq!(a, b);
        assert!(a.is_login());
        assert_eq!(a.upstream, Upstream::Auth);
    }

    #[test]
    fn test_nested_login_is_not_normalized() {
        let ups = upstreams();
        let route = resolve(&ups, "/v2/auth/login");
        assert_eq!(route.upstream, Upstream::Auth);
        assert_eq!(route.rule, MatchedRule::Nested);
        assert_eq!(route.path, "v2/auth/login");
        assert!(!route.is_login());
    }

    #[test]
    fn test_other_trailing_slashes_are_dropped() {
        let ups = upstreams();
        let route = resolve(&ups, "/products/");
        assert_eq!(route.path, "products");
    }

    #[test]
    fn test_upstream_url_with_query() {
        let ups = upstreams();
        let route = resolve(&ups, "/products");
        assert_eq!(route.upstream, Upstream::Core);
        assert_eq!(route.upstream_url(Some("page=2")), "http://core.svc:8001/products?page=2");
        assert_eq!(route.upstream_url(Some("")), "http://core.svc:8001/products");
        assert_eq!(route.upstream_url(None), "http://core.svc:8001/products");
    }

    #[test]
    fn test_login_url() {
        let ups = upstreams();
        let route = resolve(&ups, "/auth/login");
        assert_eq!(route.upstream_url(None), "http://auth.svc:8000/auth/login/");
    }

    #[test]
    fn test_query_is_forwarded_verbatim() {
        let ups = upstreams();
        let route = resolve(&ups, "/sales/reports");
        assert_eq!(
            route.upstream_url(Some("from=2024-01-01&tags=a%2Cb&q=x+y")),
            "http://core.svc:8001/sales/reports?from=2024-01-01&tags=a%2Cb&q=x+y"
        );
    }
}
