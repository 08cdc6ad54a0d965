//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! Every section falls back to its `Default` when absent from the TOML file.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Inbound listener.
    pub listener: ListenerConfig,

    /// Mount point settings.
    pub gateway: MountConfig,

    /// Base URLs of the two upstream services.
    pub upstreams: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Inbound listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Socket address the gateway accepts connections on.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where the gateway is mounted in the inbound URL space.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MountConfig {
    /// Path prefix stripped before classification (e.g., "/gateway").
    pub mount_prefix: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            mount_prefix: "/gateway".to_string(),
        }
    }
}

/// Upstream service base URLs.
///
/// Both are deployment-specific and have no usable default; validation
/// rejects a config that leaves either empty.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the user/auth service.
    pub auth_url: String,

    /// Base URL of the core business service.
    pub core_url: String,
}

/// Timeouts for the outbound call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Seconds allowed to open a connection to an upstream.
    pub connect_secs: u64,

    /// Total time allowed for one upstream exchange in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Logging and metrics settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default level for the gateway and tower-http targets.
    pub log_level: String,

    /// Serve Prometheus metrics on a separate listener.
    pub metrics_enabled: bool,

    /// Address of the Prometheus listener.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
