//! cbi-is - Inspection Service
//!
//! **Module Identity:**
//! - Name: cbi-is (Inspection Service)
//! - Port: 5750
//!
//! Owns the cabin bottle inspection workflow: flight-data capture, barcode
//! acquisition against the recognition service, qualitative assessment, and
//! registration of the composed record. The operator UI talks to this
//! service over HTTP REST + SSE; the three backend collaborators (airline
//! lookup, barcode recognition, registration) are reached through reqwest
//! clients configured here.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cbi_common::config::TomlConfig;
use cbi_common::events::EventBus;
use cbi_is::clients::ServiceClients;
use cbi_is::AppState;

/// Command-line arguments for cbi-is
#[derive(Parser, Debug)]
#[command(name = "cbi-is")]
#[command(about = "Inspection Service for CBI")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "CBI_IS_PORT")]
    port: Option<u16>,

    /// Path to the TOML config file
    #[arg(short, long, env = "CBI_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the backend services (overrides the config file)
    #[arg(long, env = "CBI_SERVICES_BASE_URL")]
    services_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cbi_is=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Priority: CLI/env argument > TOML config > compiled default
    let mut config = TomlConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(base_url) = args.services_base_url {
        config.services.base_url = base_url;
    }

    info!("Starting cbi-is (Inspection Service)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Backend services: {}", config.services.base_url);

    let clients =
        ServiceClients::http(&config.services).context("Failed to build service clients")?;

    let event_bus = EventBus::new(100);
    let state = AppState::new(clients, event_bus);

    let app = cbi_is::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
