//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handlers
//! - Wire up middleware (tracing, request ID, body limit, CORS)
//! - Bind server to listener with graceful shutdown
//! - Short-circuit OPTIONS preflights
//! - Dispatch mounted requests to routing and the forwarder
//! - Observability (metrics, request IDs)

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{Method, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::forward::{build_client, Forwarder};
use crate::http::request::{request_id, MakeGatewayRequestId};
use crate::observability::metrics;
use crate::routing::{self, strip_mount_prefix};
use crate::security::cors::{cors_middleware, preflight_response};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub forwarder: Forwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the outbound HTTP client cannot be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);
        let client = build_client(&config.timeouts)?;

        let state = AppState {
            config: config.clone(),
            forwarder: Forwarder::new(client, config.limits.max_body_size),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let prefix = config.gateway.mount_prefix.as_str();

        Router::new()
            .route("/health", get(health_handler))
            .route(prefix, any(gateway_handler))
            // the catch-all below never matches an empty remainder
            .route(&format!("{}/", prefix), any(gateway_handler))
            .route(&format!("{}/{{*path}}", prefix), any(gateway_handler))
            .fallback(fallback_handler)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id(req.headers()),
                    method = %req.method(),
                    uri = %req.uri(),
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeGatewayRequestId))
            .layer(middleware::map_response(cors_middleware))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_prefix = %self.config.gateway.mount_prefix,
            auth_url = %self.config.upstreams.auth_url,
            core_url = %self.config.upstreams.core_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

fn is_forwarded_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Main gateway handler.
/// Classifies the path, forwards the request, and relays the answer.
async fn gateway_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if method == Method::OPTIONS {
        metrics::record_request(method.as_str(), 204, "gateway", start_time);
        return preflight_response();
    }

    if !is_forwarded_method(&method) {
        let response = GatewayError::MethodNotAllowed(method.to_string()).into_response();
        metrics::record_request(method.as_str(), response.status().as_u16(), "gateway", start_time);
        return response;
    }

    let Some(remainder) = strip_mount_prefix(&path, &state.config.gateway.mount_prefix) else {
        let response = GatewayError::NotFound(path.clone()).into_response();
        metrics::record_request(method.as_str(), response.status().as_u16(), "gateway", start_time);
        return response;
    };

    let route = routing::resolve(&state.config.upstreams, remainder);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        upstream = %route.upstream,
        rule = ?route.rule,
        forwarded_path = %route.path,
        "Proxying request"
    );

    let response = match state.forwarder.forward(&route, request).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                upstream = %route.upstream,
                status = response.status().as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request relayed"
            );
            response
        }
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(
                    request_id = %request_id,
                    upstream = %route.upstream,
                    url = %route.upstream_url(None),
                    error = ?e.details(),
                    "Upstream request failed"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    path = %path,
                    error = %e,
                    details = ?e.details(),
                    "Request rejected"
                );
            }
            e.into_response()
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        route.upstream.as_str(),
        start_time,
    );
    response
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn fallback_handler(uri: Uri) -> Response {
    GatewayError::NotFound(uri.path().to_string()).into_response()
}
