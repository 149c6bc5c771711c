//! Interval-driven refresh scheduling.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::interval;
use tracing::{error, info};

use crate::refresh::Refresher;

/// Refresh loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Seconds between refreshes
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Persist the derived tables on each successful refresh
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// Also persist pre-transform audit copies of the raw tables
    #[serde(default)]
    pub save_raw: bool,
}

fn default_refresh_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_persist() -> bool {
    true
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            persist: default_persist(),
            save_raw: false,
        }
    }
}

impl WorkerConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Drives the refresher on a fixed wall-clock interval.
pub struct RefreshScheduler {
    config: WorkerConfig,
    refresher: Arc<Refresher>,
}

impl RefreshScheduler {
    pub fn new(config: WorkerConfig, refresher: Arc<Refresher>) -> Self {
        Self { config, refresher }
    }

    /// Starts the refresh loop.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        info!(
            interval_secs = self.config.refresh_interval_secs,
            "refresh scheduler started"
        );

        tokio::spawn(async move {
            let mut ticker = interval(self.config.refresh_interval());
            // Consume the immediate first tick; startup already ran the
            // initial refresh.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                match self.refresher.refresh(self.config.persist).await {
                    Ok(source) => info!(?source, "scheduled refresh complete"),
                    // Previous tables stay published; next tick retries.
                    Err(e) => error!("scheduled refresh failed: {}", e),
                }
            }
        })
    }
}
