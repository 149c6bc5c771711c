//! COVID-GR stats dashboard backend
//!
//! Scrapes the public Greek COVID-19 statistics page, derives the
//! rolling/cumulative metrics, persists CSV snapshots, and keeps the four
//! result tables published as process-wide state for the view layer:
//! - Fetch + extract embedded JSON tables from the source page
//! - Transform: cumulative sums, corrected daily test deltas, rates,
//!   category/age/gender breakdown
//! - Snapshot fallback when the live fetch fails

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use innews_client::{InnewsClient, UpstreamConfig};
use snapshot_store::{SnapshotConfig, SnapshotStore};
use telemetry::{health, init_tracing_from_env};
use worker::{RefreshScheduler, Refresher, StatsState, WorkerConfig};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    upstream: UpstreamConfig,

    #[serde(default)]
    snapshot: SnapshotConfig,

    #[serde(default)]
    worker: WorkerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            snapshot: SnapshotConfig::default(),
            worker: WorkerConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting COVID-GR stats pipeline v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    info!(
        url = %config.upstream.base_url,
        data_dir = %config.snapshot.data_dir.display(),
        interval_secs = config.worker.refresh_interval_secs,
        "Loaded configuration"
    );

    let client = InnewsClient::new(config.upstream.clone())
        .context("Failed to create source client")?;
    let store = SnapshotStore::new(config.snapshot.clone());
    let state = Arc::new(StatsState::new());

    let refresher = Arc::new(Refresher::new(
        client,
        store,
        state.clone(),
        config.worker.save_raw,
    ));

    // Startup refresh. A total failure (no live data AND no snapshot) is
    // not fatal for the process: it keeps running with empty tables and
    // unhealthy components so the view layer can show an error state.
    match refresher.refresh(config.worker.persist).await {
        Ok(source) => info!(?source, "startup refresh complete"),
        Err(e) => {
            error!("startup refresh produced no data: {}", e);
            error!("health: {:?}", health().report().status);
        }
    }

    // Start the periodic refresh loop
    let scheduler = RefreshScheduler::new(config.worker.clone(), refresher.clone());
    let _refresh_handle = scheduler.start();

    // Run until shutdown signal; the view layer reads `state` in-process.
    shutdown_signal().await;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("COVIDGR")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested fields from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(url) = std::env::var("COVIDGR_UPSTREAM_BASE_URL") {
        config.upstream.base_url = url;
    }
    if let Ok(dir) = std::env::var("COVIDGR_DATA_DIR") {
        config.snapshot.data_dir = dir.into();
    }
    if let Ok(secs) = std::env::var("COVIDGR_REFRESH_INTERVAL_SECS") {
        config.worker.refresh_interval_secs = secs
            .parse()
            .context("COVIDGR_REFRESH_INTERVAL_SECS must be an integer")?;
    }
    if let Ok(persist) = std::env::var("COVIDGR_PERSIST") {
        config.worker.persist = persist == "1" || persist.to_lowercase() == "true";
    }
    if let Ok(save_raw) = std::env::var("COVIDGR_SAVE_RAW") {
        config.worker.save_raw = save_raw == "1" || save_raw.to_lowercase() == "true";
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
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
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
