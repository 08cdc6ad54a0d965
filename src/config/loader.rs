//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
/// Environment variable overriding `gateway.mount_prefix`.
pub const ENV_MOUNT_PREFIX: &str = "GATEWAY_MOUNT_PREFIX";
/// Environment variable overriding `upstreams.auth_url`.
pub const ENV_AUTH_URL: &str = "GATEWAY_AUTH_URL";
/// Environment variable overriding `upstreams.core_url`.
pub const ENV_CORE_URL: &str = "GATEWAY_CORE_URL";
/// Environment variable overriding `timeouts.upstream_secs`.
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "GATEWAY_UPSTREAM_TIMEOUT_SECS";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "GATEWAY_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => write!(f, "Invalid value for {}: '{}'", var, value),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a configuration from a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay environment-provided values onto a configuration.
///
/// `lookup` abstracts the environment so callers can pass `std::env::var`
/// or a fixed map.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
    if let Some(v) = lookup(ENV_MOUNT_PREFIX) {
        config.gateway.mount_prefix = v;
    }
    if let Some(v) = lookup(ENV_AUTH_URL) {
        config.upstreams.auth_url = v;
    }
    if let Some(v) = lookup(ENV_CORE_URL) {
        config.upstreams.core_url = v;
    }
    if let Some(v) = lookup(ENV_UPSTREAM_TIMEOUT_SECS) {
        config.timeouts.upstream_secs = v.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_UPSTREAM_TIMEOUT_SECS,
            value: v.clone(),
        })?;
    }
    if let Some(v) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = v;
    }
    Ok(config)
}

/// Load the effective configuration: optional TOML file, then process
/// environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let base = match path {
        Some(p) => read_config_file(p)?,
        None => GatewayConfig::default(),
    };
    let config = apply_env_overrides(base, |key| std::env::var(key).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
