//! Single-exchange forwarding.
//!
//! # Responsibilities
//! - Build the outbound request from the inbound one and a resolved route
//! - Apply header filtering and body normalization
//! - Issue exactly one upstream call and relay its answer
//!
//! # Design Decisions
//! - Body normalization completes before the network is touched
//! - No retries and no fallback upstream
//! - Upstream errors surface as `GatewayError::Upstream` (500)

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method},
    response::Response,
};

use crate::error::GatewayError;
use crate::forward::body::{body_policy, build_form, read_body, ForwardBody};
use crate::forward::relay::relay_response;
use crate::routing::Route;
use crate::security::headers::{declared_content_type, ensure_content_type, forwardable_headers, DEFAULT_CONTENT_TYPE};

/// Issues upstream calls. Cheap to clone; the client pools connections.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    max_body_size: usize,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, max_body_size: usize) -> Self {
        Self {
            client,
            max_body_size,
        }
    }

    /// Forward `request` along `route` and relay the upstream response.
    pub async fn forward(&self, route: &Route<'_>, request: Request) -> Result<Response, GatewayError> {
        let method = request.method().clone();
        let query = request.uri().query().map(str::to_owned);
        let inbound_headers = request.headers().clone();
        let content_type = declared_content_type(&inbound_headers);

        let policy = body_policy(&method, content_type.as_deref(), route.is_login());
        let body = read_body(request, policy, self.max_body_size).await?;

        let headers = outbound_headers(&inbound_headers, &method, &body);
        let url = route.upstream_url(query.as_deref());

        tracing::debug!(
            url = %url,
            body = body.kind(),
            "Issuing upstream request"
        );

        let builder = self.client.request(method, &url).headers(headers);
        let builder = match body {
            ForwardBody::Empty => builder,
            ForwardBody::Json(value) => {
                let encoded = serde_json::to_vec(&value)
                    .map_err(|e| GatewayError::Internal(e.to_string()))?;
                builder.body(encoded)
            }
            ForwardBody::Raw(bytes) => builder.body(bytes),
            ForwardBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let upstream = builder.send().await.map_err(GatewayError::Upstream)?;
        relay_response(upstream).await
    }
}

/// Headers for the outbound request, adjusted to the normalized body.
pub fn outbound_headers(inbound: &HeaderMap, method: &Method, body: &ForwardBody) -> HeaderMap {
    let mut headers = forwardable_headers(inbound);
    match body {
        // the client writes a Content-Type carrying the new boundary
        ForwardBody::Multipart(_) => {
            headers.remove(header::CONTENT_TYPE);
        }
        ForwardBody::Json(_) => {
            let declared_json = declared_content_type(&headers)
                .is_some_and(|ct| ct.contains("application/json"));
            if !declared_json {
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
            }
        }
        ForwardBody::Empty | ForwardBody::Raw(_) => ensure_content_type(&mut headers, method),
    }
    headers
}
