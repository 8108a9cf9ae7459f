//! Meetwatch server - Main entry point
//!
//! Opens the meetings database, starts the once-per-minute alert scheduler,
//! and serves the HTTP API with the SSE event stream.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meetwatch_server::{api, db, scheduler, sse::AlertBroadcaster};

/// Buffered alerts per subscriber before a lagging client starts losing events
const BROADCAST_CAPACITY: usize = 100;

/// Command-line arguments for meetwatch-server
#[derive(Parser, Debug)]
#[command(name = "meetwatch-server")]
#[command(about = "Meeting alert service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "MEETWATCH_PORT")]
    port: u16,

    /// Path to the SQLite database file
    #[arg(short, long, env = "MEETWATCH_DB")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meetwatch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let db_path = meetwatch_common::config::resolve_database_path(args.database)
        .context("Failed to resolve database path")?;
    info!("Database: {}", db_path.display());

    let pool = db::init::open_pool(&db_path)
        .await
        .context("Failed to open database")?;

    let broadcaster = AlertBroadcaster::new(BROADCAST_CAPACITY);

    // The scheduler owns its transition tracker; it runs until the process
    // exits and never needs to be joined
    tokio::spawn(scheduler::run(pool.clone(), broadcaster.clone()));

    let app = api::create_router(api::AppState {
        db: pool,
        broadcaster,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

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
