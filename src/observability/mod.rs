//! Logs and metrics for forwarded traffic.
//!
//! ```text
//! gateway_handler
//!     → logging.rs   tracing subscriber, one span per request keyed by x-request-id
//!     → metrics.rs   gateway_requests_total, gateway_request_duration_seconds
//!
//! Output:
//!     stdout (fmt layer, EnvFilter)
//!     Prometheus scrape listener, only when metrics_enabled
//! ```

pub mod logging;
pub mod metrics;
