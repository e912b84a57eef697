//! Upstream relay
//!
//! A small reverse proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                    RELAY                     │
//!     Browser Request     │  ┌──────────┐    ┌──────────┐    ┌────────┐  │
//!     ────────────────────┼─▶│  cors +  │───▶│  origin  │───▶│handler │  │
//!                         │  │ req. id  │    │  filter  │    │        │  │
//!                         │  └──────────┘    └────┬─────┘    └───┬────┘  │
//!                         │                       │ 403          │       │
//!                         │                       ▼              ▼       │
//!     Response            │                 {"error"}     ┌──────────┐   │     Stats API /
//!     ◀───────────────────┼─────────────────────────────── │ upstream │◀──┼──── Document store
//!                         │   200 body / 500 {error,detail}│ + secret │   │
//!                         │                                └──────────┘   │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use upstream_relay::config::load_config;
use upstream_relay::observability::{logging, metrics};
use upstream_relay::{RelayServer, Shutdown};

#[derive(Parser)]
#[command(name = "upstream-relay")]
#[command(about = "Relays browser calls to the stats API and document store", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port, overriding PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal in production.
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("upstream-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.bind_address(),
        policy = %config.access.policy,
        allowed_origins = ?config.access.allowed_origins,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = RelayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
