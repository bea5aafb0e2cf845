//! SETTLE demo checkout server
//!
//! Serves the simulated crypto checkout: checkout links, sessions with a
//! timer-driven payment status, the success view and a static merchant
//! dashboard.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use settle_core::session::SessionReaper;
use shutdown::{shutdown_signal, spawn_config_reload_handler};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// SETTLE - demo crypto checkout with simulated settlement
#[derive(Parser, Debug)]
#[command(name = "settle-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "SETTLE_CONFIG", default_value = "./settle-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting settle-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // One store per section so reloads can swap them independently
    let shared_config = loaded_config.into_shared();

    // Create application state
    let state = AppState::new(shared_config.clone());

    // Background tasks stop when this flips to true
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reaper = tokio::spawn(
        SessionReaper::new(
            state.sessions.clone(),
            shared_config.simulator.clone(),
            shutdown_rx.clone(),
        )
        .run(),
    );

    // Spawn config reload handler (listens for SIGHUP)
    let reload_handler =
        spawn_config_reload_handler(state.clone(), config_loader, shutdown_rx);

    // Build the router
    let router = build_router(state);

    // The reaper closes every session once the watch flips, which ends their
    // WebSocket streams so the graceful drain is not held up by open views.
    let shutdown = async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr, shutdown).await;

    if let Err(e) = reaper.await {
        tracing::error!(error = %e, "Session reaper task failed");
    }
    if let Err(e) = reload_handler.await {
        tracing::error!(error = %e, "Config reload task failed");
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
