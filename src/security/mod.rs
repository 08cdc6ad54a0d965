//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request:
//!     → headers.rs (strip transport headers, default Content-Type)
//!
//! Every response:
//!     → headers.rs (strip hop-by-hop and CORS headers from upstream responses)
//!     → cors.rs (attach the fixed CORS policy)
//! ```
//!
//! # Design Decisions
//! - No trust decisions here: authentication belongs to the upstreams
//! - Transport-scoped headers never cross the gateway
//! - CORS is uniform, including on errors

pub mod cors;
pub mod headers;
