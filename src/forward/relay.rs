//! Upstream response relay.
//!
//! # Responsibilities
//! - Buffer the complete upstream body
//! - Keep the upstream status, including non-2xx, without interpretation
//! - Pass Content-Type (defaulting to JSON) and every header outside the denylist
//!
//! # Design Decisions
//! - Not streamed: the body is read fully before the response is built
//! - Bytes, not text, so non-UTF-8 payloads (exports, images) survive
//! - CORS is added later by the router-wide middleware

use axum::{body::Body, response::Response};

use crate::error::GatewayError;
use crate::security::headers::relayed_headers;

/// Convert an upstream response into the client response.
pub async fn relay_response(upstream: reqwest::Response) -> Result<Response, GatewayError> {
    let status = upstream.status();
    let headers = relayed_headers(upstream.headers());
    let body = upstream.bytes().await.map_err(GatewayError::UpstreamBody)?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
