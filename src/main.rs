//! Sign-up relay service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                 ┌──────────────────────────────────────┐
//!     POST /api/signup ─────▶│ http::server (request ID, limits,    │
//!                            │               trace)                 │
//!                            │        │                             │
//!                            │        ▼                             │
//!                            │ relay::SignupRelay ── POST JSON ─────┼──▶ Upstream
//!                            │   (405 gate, deadline, envelope)  ◀──┼─── webhook
//!     ◀──────────────────────│                                      │
//!       mirrored status/body └──────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use signup_relay::config::{resolve_config, ConfigError, ConfigOverrides, RelayConfig};
use signup_relay::lifecycle::{signals, Shutdown};
use signup_relay::observability::{logging, metrics};
use signup_relay::HttpServer;

#[derive(Parser)]
#[command(name = "signup-relay")]
#[command(about = "Relays sign-up form submissions to the onboarding webhook", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "SIGNUP_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long, env = "SIGNUP_RELAY_BIND")]
    bind: Option<String>,

    /// Override upstream.url.
    #[arg(long, env = "SIGNUP_RELAY_UPSTREAM_URL")]
    upstream_url: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<RelayConfig, ConfigError> {
        let overrides = ConfigOverrides {
            bind_address: self.bind,
            upstream_url: self.upstream_url,
        };
        resolve_config(self.config.as_deref(), overrides)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("signup-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
