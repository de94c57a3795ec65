//! Tally activity-log service binary.
//!
//! Loads settings, opens the durable store, wires the shared [`Logger`],
//! spawns the retention cleanup task, and serves the viewer router until
//! ctrl-c.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::Map;
use tracing_subscriber::EnvFilter;

use tally_core::{LogCategory, LogMetadata, LogStorage};
use tally_logger::{Logger, LoggerConfig};
use tally_server::{AppState, router, spawn_cleanup_task};
use tally_settings::{load_settings, load_settings_from_path};
use tally_store::SqliteLogStore;

/// Command-line overrides for the activity-log service.
#[derive(Debug, Parser)]
#[command(name = "tally-server", about = "Tally activity log service")]
struct Args {
    /// Settings file path (defaults to ~/.tally/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the viewer bind port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the durable store path.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();
    let mut settings = match args.settings {
        Some(ref path) => load_settings_from_path(path)?,
        None => load_settings()?,
    };
    if let Some(port) = args.port {
        settings.viewer.port = port;
    }
    if let Some(db) = args.db {
        settings.logging.db_path = db.display().to_string();
    }

    let store: Arc<dyn LogStorage> =
        Arc::new(SqliteLogStore::open(Path::new(&settings.logging.db_path))?);
    tracing::info!(path = %settings.logging.db_path, "log store opened");

    let logger = Logger::new(LoggerConfig {
        min_level: settings.logging.level,
        console: settings.logging.console,
        storage: settings.logging.storage,
        adapter: Some(store.clone()),
    });
    logger
        .info(
            LogCategory::System,
            "service_started",
            "activity log service started",
            Map::new(),
            LogMetadata::default(),
        )
        .await;

    let cleanup = spawn_cleanup_task(
        store.clone(),
        settings.logging.retention_days,
        Duration::from_secs(settings.logging.cleanup_interval_hours * 3600),
    );

    let state = AppState::new(store, settings.clone());
    let app = router(state);

    let addr = format!("{}:{}", settings.viewer.host, settings.viewer.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "log viewer listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    logger
        .info(
            LogCategory::System,
            "service_stopped",
            "activity log service shutting down",
            Map::new(),
            LogMetadata::default(),
        )
        .await;
    cleanup.abort();
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
