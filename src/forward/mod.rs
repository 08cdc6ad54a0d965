//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Route + inbound request
//!     → body.rs (policy from method/Content-Type/login, buffer, normalize)
//!         ✗ malformed JSON → GatewayError (400), upstream untouched
//!     → forwarder.rs (filter headers, build URL, issue call)
//!         ✗ connect/timeout/transport failure → GatewayError (500)
//!     → relay.rs (status, Content-Type, upstream headers minus hop-by-hop, buffered body)
//!     → client response
//! ```
//!
//! # Design Decisions
//! - One upstream call per inbound request, never retried
//! - Upstream non-2xx is relayed, not treated as an error
//! - One reqwest client for the process (client.rs)

pub mod body;
pub mod client;
pub mod forwarder;
pub mod relay;

pub use body::{BodyPolicy, ForwardBody, FormPart};
pub use client::build_client;
pub use forwarder::Forwarder;
