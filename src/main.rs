//! Notification hub.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                   NOTIFY HUB                         │
//!                      │                                                      │
//!   POST /send[/slug]  │  ┌────────┐   ┌────────┐   ┌───────────┐             │
//!   ───────────────────┼─▶│  http  │──▶│  auth  │──▶│   send    │             │
//!                      │  │ server │   │        │   │ handlers  │             │
//!                      │  └────────┘   └────────┘   └─────┬─────┘             │
//!                      │                                  │                   │
//!                      │           ┌──────────────┬───────┴──────┐            │
//!                      │           ▼              ▼              ▼            │
//!                      │   ┌────────────┐ ┌────────────┐ ┌────────────┐       │
//!                      │   │ formatters │ │  routing   │ │    chat    │───────┼──▶ Bot API
//!                      │   │  registry  │ │  registry  │ │   client   │       │
//!                      │   └────────────┘ └─────▲──────┘ └─────▲──────┘       │
//!                      │                        │              │              │
//!                      │   ┌────────────┐ ┌─────┴──────┐ ┌─────┴──────┐       │
//!   settings.json ◀────┼──▶│   config   │─│   store    │─│provisioning│       │
//!                      │   │  watcher   │ │            │ │ reconciler │       │
//!                      │   └────────────┘ └────────────┘ └────────────┘       │
//!                      │                                                      │
//!                      │   health pinger ─────────────────────────────────────┼──▶ health sink
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use notify_hub::config::loader::load_config;
use notify_hub::config::watcher::ConfigWatcher;
use notify_hub::http::HttpServer;
use notify_hub::lifecycle::{self, Shutdown};
use notify_hub::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "notify-hub", version, about = "Routes HTTP notifications into chat topics")]
struct Args {
    /// Path to the configuration document
    #[arg(short, long, default_value = "settings.json")]
    settings: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The level lives in the document, which may not exist yet.
    let level = load_config(&args.settings)
        .map(|c| c.log_level)
        .unwrap_or_else(|_| "info".to_string());
    logging::init(&level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "notify-hub starting");

    let state = match lifecycle::start(&args.settings).await {
        Ok(state) => state,
        Err(e) if e.bootstrap_halt().is_some() => {
            tracing::info!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let shutdown = Arc::new(Shutdown::new());

    if let Some(pinger) = state.health.clone() {
        let rx = shutdown.subscribe();
        tokio::spawn(async move { pinger.run(rx).await });
    }

    let (watcher, config_updates) = ConfigWatcher::new(state.store.path());
    // Dropping the handle stops the watch.
    let _watch_guard = match watcher.run() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
            None
        }
    };

    let port = state.store.snapshot().port;
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let signal = lifecycle::wait_for_signal().await;
        tracing::info!(signal, "Shutting down");
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(state);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
