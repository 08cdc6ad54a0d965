//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound path (mount prefix included)
//!     → router.rs (strip mount prefix)
//!     → matcher.rs (split segments, classify auth | core)
//!     → router.rs (pick base URL, rebuild path, login normalization)
//!     → Return: Route { upstream, base_url, path }
//! ```
//!
//! # Design Decisions
//! - No routing table: classification is a pure function
//! - Deterministic: same path always resolves to the same route
//! - No NoMatch for mounted paths: core is the default upstream

pub mod matcher;
pub mod router;

pub use matcher::{classify, MatchedRule, Upstream};
pub use router::{resolve, strip_mount_prefix, Route};
