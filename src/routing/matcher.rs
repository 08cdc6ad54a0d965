//! Upstream classification.
//!
//! # Responsibilities
//! - Split the forwarded path into segments
//! - Decide whether a path belongs to the auth service or the core service
//!
//! # Design Decisions
//! - Pure functions over string slices, no state and no config
//! - Segment comparison is exact and case-sensitive
//! - Two rules route to auth: a leading `auth` segment, or an `auth`
//!   segment anywhere in the path. The second subsumes the first; both are
//!   evaluated so each shape stays visible in logs.
//! - Everything else goes to core, so classification cannot fail

use std::fmt;

/// The path segment that marks auth-service traffic.
pub const AUTH_SEGMENT: &str = "auth";

/// One of the two upstream services behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    /// The user/auth service.
    Auth,
    /// The core business service.
    Core,
}

impl Upstream {
    /// Stable lowercase name, used for log fields and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Auth => "auth",
            Upstream::Core => "core",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule decided the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule {
    /// First segment is `auth`.
    Prefix,
    /// An `auth` segment appears later in the path.
    Nested,
    /// No `auth` segment; core by default.
    Default,
}

/// Split a path into its non-empty segments.
///
/// Leading, trailing and repeated slashes are ignored, so `auth/login/`
/// and `/auth//login` both yield `["auth", "login"]`.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn starts_with_auth(segments: &[&str]) -> bool {
    segments.first() == Some(&AUTH_SEGMENT)
}

fn contains_auth(segments: &[&str]) -> bool {
    segments.iter().any(|s| *s == AUTH_SEGMENT)
}

/// Classify a segment list, reporting the rule that matched.
pub fn classify_with_rule(segments: &[&str]) -> (Upstream, MatchedRule) {
    if starts_with_auth(segments) {
        (Upstream::Auth, MatchedRule::Prefix)
    } else if contains_auth(segments) {
        (Upstream::Auth, MatchedRule::Nested)
    } else {
        (Upstream::Core, MatchedRule::Default)
    }
}

/// Classify a segment list into its upstream.
pub fn classify(segments: &[&str]) -> Upstream {
    classify_with_rule(segments).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ignores_empty_segments() {
        assert_eq!(split_segments("auth/login/"), vec!["auth", "login"]);
        assert_eq!(split_segments("/auth//login"), vec!["auth", "login"]);
        assert!(split_segments("").is_empty());
        assert!(split_segments("///").is_empty());
    }

    #[test]
    fn test_leading_auth_segment() {
        assert_eq!(classify_with_rule(&["auth", "login"]), (Upstream::Auth, MatchedRule::Prefix));
        assert_eq!(classify(&["auth"]), Upstream::Auth);
    }

    #[test]
    fn test_nested_auth_segment() {
        assert_eq!(
            classify_with_rule(&["companies", "auth", "users"]),
            (Upstream::Auth, MatchedRule::Nested)
        );
        assert_eq!(classify(&["v1", "auth"]), Upstream::Auth);
    }

    #[test]
    fn test_substring_is_not_a_segment_match() {
        assert_eq!(classify(&["authors"]), Upstream::Core);
        assert_eq!(classify(&["oauth", "callback"]), Upstream::Core);
        assert_eq!(classify(&["products", "AUTH"]), Upstream::Core);
    }

    #[test]
    fn test_everything_else_is_core() {
        assert_eq!(classify_with_rule(&["products"]), (Upstream::Core, MatchedRule::Default));
        assert_eq!(classify(&[]), Upstream::Core);
    }

    #[test]
    fn test_auth_anywhere_always_routes_to_auth() {
        let heads = ["", "sales", "inventory/items"];
        let tails = ["", "login", "users/42"];
        for head in heads {
            for tail in tails {
                let path = format!("{}/auth/{}", head, tail);
                let segments = split_segments(&path);
                assert_eq!(classify(&segments), Upstream::Auth, "path {:?}", path);
            }
        }
    }
}
