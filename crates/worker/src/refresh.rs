//! The refresh orchestrator: fetch → transform → persist → publish.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use innews_client::InnewsClient;
use snapshot_store::SnapshotStore;
use stats_core::{
    transform_daily, transform_three_day, transform_total, transform_weekly, Result, Snapshot,
};
use telemetry::health;

use crate::state::StatsState;

/// Where the tables of a completed refresh came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSource {
    /// Freshly fetched and transformed live data.
    Upstream,
    /// The last persisted snapshot, served because the fetch failed.
    Snapshot,
}

/// Runs one full refresh cycle and installs the result.
pub struct Refresher {
    client: InnewsClient,
    store: SnapshotStore,
    state: Arc<StatsState>,
    save_raw: bool,
    // Serializes overlapping refreshes (startup racing the scheduler);
    // the published state is last-writer-wins either way.
    gate: Mutex<()>,
}

impl Refresher {
    pub fn new(
        client: InnewsClient,
        store: SnapshotStore,
        state: Arc<StatsState>,
        save_raw: bool,
    ) -> Self {
        Self {
            client,
            store,
            state,
            save_raw,
            gate: Mutex::new(()),
        }
    }

    /// Run one refresh cycle.
    ///
    /// On a transient fetch failure the last persisted snapshot is
    /// reloaded and published verbatim. The published state only ever
    /// changes as a whole: any error before the final publish leaves the
    /// previous tables in place and propagates upward.
    pub async fn refresh(&self, persist: bool) -> Result<RefreshSource> {
        let _gate = self.gate.lock().await;

        let raw = match self.client.fetch_raw().await {
            Ok(raw) => {
                health().upstream.set_healthy();
                raw
            }
            Err(err) if err.is_transient() => {
                health().upstream.set_unhealthy(err.to_string());
                warn!(error = %err, "live fetch failed, falling back to last snapshot");
                return self.restore_snapshot();
            }
            Err(err) => return Err(err),
        };

        if self.save_raw {
            self.store.write_raw_bundle(&raw)?;
        }

        let snapshot = Snapshot {
            daily: transform_daily(&raw.daily),
            three_day: transform_three_day(raw.three_day),
            weekly: transform_weekly(raw.weekly),
            total: transform_total(&raw.total)?,
        };

        if persist {
            self.store.write_daily(&snapshot.daily)?;
            self.store.write_three_day(&snapshot.three_day)?;
            self.store.write_weekly(&snapshot.weekly)?;
            self.store.write_total(&snapshot.total)?;
            health().snapshot.set_healthy();
        }

        info!(
            days = snapshot.daily.len(),
            breakdown_rows = snapshot.total.len(),
            "installed fresh tables"
        );
        self.state.publish(snapshot);

        Ok(RefreshSource::Upstream)
    }

    fn restore_snapshot(&self) -> Result<RefreshSource> {
        match self.store.load() {
            Ok(snapshot) => {
                health().snapshot.set_healthy();
                info!(days = snapshot.daily.len(), "serving last persisted snapshot");
                self.state.publish(snapshot);
                Ok(RefreshSource::Snapshot)
            }
            Err(err) => {
                // No live data and no snapshot: this cycle has nothing to
                // serve, the previous state (possibly empty) stands.
                health().snapshot.set_unhealthy(err.to_string());
                Err(err)
            }
        }
    }
}
