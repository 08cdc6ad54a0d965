//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → OPTIONS? → 204 preflight, done
//!     → [routing layer picks upstream]
//!     → [forward layer calls upstream and relays]
//!     → CORS middleware → client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, MakeGatewayRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
