//! Console API gateway library.
//!
//! Forwards browser traffic under a mount prefix to one of two upstream
//! services, auth or core, chosen by the request path.

pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
