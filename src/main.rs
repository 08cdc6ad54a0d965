//! Console API gateway.
//!
//! Sits between the browser console and two backend services.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                   GATEWAY                    │
//!     Client Request      │  ┌────────┐   ┌──────────┐   ┌────────────┐  │      ┌──────────────┐
//!     ────────────────────┼─▶│  http  │──▶│ routing  │──▶│  forward   │──┼─────▶│ auth service │
//!                         │  │ server │   │ auth|core│   │ body/hdrs  │  │      └──────────────┘
//!                         │  └────────┘   └──────────┘   └─────┬──────┘  │      ┌──────────────┐
//!     Client Response     │  ┌────────┐                  ┌─────▼──────┐  │─────▶│ core service │
//!     ◀───────────────────┼──│  CORS  │◀─────────────────│   relay    │◀─┼──────┴──────────────┘
//!                         │  └────────┘                  └────────────┘  │
//!                         │                                              │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use console_gateway::config::{load_config, validation::validate_config, ConfigError};
use console_gateway::lifecycle::startup;
use console_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "console-gateway")]
#[command(about = "API gateway forwarding console traffic to the auth and core services", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("console-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_prefix = %config.gateway.mount_prefix,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
