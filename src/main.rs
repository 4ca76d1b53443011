//! Lottery Console
//!
//! A small operator console for a deployed lottery contract, built with
//! Tokio, Axum and alloy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser / lottery-cli
//!     ─────────────────────────▶ http (pages + JSON API, session cookie)
//!                                   │
//!                    ┌──────────────┼───────────────────┐
//!                    ▼              ▼                   ▼
//!               lottery         lottery            explorer
//!               reader          entry/manager      lookup
//!                    │              │                   │
//!                    └──────┬───────┘                   ▼
//!                           ▼                     explorer HTTP API
//!                      blockchain
//!              (failover RPC, wallet, tx)
//!                           │
//!                           ▼
//!                   Ethereum JSON-RPC node
//! ```
//!
//! Cross-cutting: config (TOML), observability (tracing + Prometheus),
//! lifecycle (signals, graceful shutdown).

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use lottery_console::config::load_or_default;
use lottery_console::http::HttpServer;
use lottery_console::lifecycle::{signals, Shutdown};
use lottery_console::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "lottery-console")]
#[command(about = "Web console for a deployed lottery contract", long_about = None)]
struct Args {
    /// Path to a TOML config file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("lottery-console v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.lottery.contract_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::from_config(config).await?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
