//! Photo Gateway
//!
//! Thin backend for a single-page photo game, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  PHOTO GATEWAY                   │
//!                         │                                                  │
//!     Client Request      │  ┌──────────┐    ┌──────────┐    ┌────────────┐  │
//!     ────────────────────┼─▶│ request  │───▶│ dispatch │───▶│  routing   │  │
//!                         │  │ tagger   │    │          │    │ rule table │  │
//!                         │  └──────────┘    └────┬─────┘    └────────────┘  │
//!                         │                       │                          │
//!                         │      ┌────────────┬───┴────────┬────────────┐    │
//!                         │      ▼            ▼            ▼            ▼    │
//!                         │ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐  │
//!                         │ │upstream │ │  token   │ │ static / │ │404/405│  │
//!                         │ │+transl. │ │ service  │ │   SPA    │ │       │  │
//!                         │ └────┬────┘ └──────────┘ └──────────┘ └───────┘  │
//!                         └──────┼───────────────────────────────────────────┘
//!                                ▼
//!                         third-party photo API
//! ```

use std::path::PathBuf;

use clap::Parser;

use photo_gateway::config::{self, loader};
use photo_gateway::lifecycle::{self, signals, Shutdown};
use photo_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "photo-gateway")]
#[command(about = "Serves the photo game frontend and proxies the photo API", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults plus environment are used without it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding config and environment.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_from_env()?,
    };
    if let Some(port) = cli.port {
        loader::set_port(&mut config, &port.to_string());
    }

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("photo-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.upstream.api_key.is_empty() {
        tracing::warn!("No upstream API key configured; photo routes will be rejected upstream");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_ms = config.upstream.timeout_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
