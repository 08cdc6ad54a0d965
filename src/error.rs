//! Gateway error types and responses.
//!
//! Every failure the gateway itself produces is rendered as a JSON body of
//! the form `{"error": "...", "details": "..."}`. Upstream non-2xx answers
//! are not errors here; they are relayed as-is.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while forwarding a single request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body declared as JSON did not parse.
    #[error("Invalid JSON in request body")]
    MalformedJson(#[source] serde_json::Error),

    /// Multipart form could not be parsed.
    #[error("Invalid multipart form data")]
    MalformedMultipart(String),

    /// Inbound body stream failed before it was fully read.
    #[error("Failed to read request body")]
    BodyRead(String),

    /// Inbound body exceeds the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge { limit: usize },

    /// Method the gateway does not forward.
    #[error("Method not allowed")]
    MethodNotAllowed(String),

    /// Path outside the gateway mount.
    #[error("Not found")]
    NotFound(String),

    /// Upstream could not be reached, timed out, or the exchange failed.
    #[error("Failed to forward request to upstream service")]
    Upstream(#[source] reqwest::Error),

    /// Upstream answered but its body could not be read.
    #[error("Failed to read upstream response")]
    UpstreamBody(#[source] reqwest::Error),

    /// Outbound request could not be assembled.
    #[error("Failed to build upstream request")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl GatewayError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedJson(_) | Self::MalformedMultipart(_) | Self::BodyRead(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::UpstreamBody(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Human-readable detail for the `details` field, when there is one.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::MalformedJson(e) => Some(e.to_string()),
            Self::MalformedMultipart(msg) | Self::BodyRead(msg) | Self::Internal(msg) => {
                Some(msg.clone())
            }
            Self::PayloadTooLarge { limit } => Some(format!("limit is {} bytes", limit)),
            Self::MethodNotAllowed(method) => Some(format!("{} is not forwarded", method)),
            Self::NotFound(path) => Some(format!("no route for {}", path)),
            Self::Upstream(e) | Self::UpstreamBody(e) => Some(describe_reqwest_error(e)),
        }
    }

    /// Build the serializable error body.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            details: self.details(),
        }
    }
}

/// Flatten a reqwest error and its source chain into one line.
///
/// reqwest's own Display omits the cause ("error sending request"), which
/// is the useful part for "connection refused" or DNS failures.
fn describe_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    if err.is_timeout() && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }
    message
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
