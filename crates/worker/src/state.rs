//! Process-wide published table state.

use std::sync::Arc;

use parking_lot::RwLock;

use stats_core::Snapshot;

/// The published set of four tables.
///
/// A refresh builds its snapshot completely before calling
/// [`StatsState::publish`], which swaps the shared handle in a single
/// write. Readers clone the `Arc` and keep a consistent view for as long
/// as they hold it; no reader ever observes a mix of old and new tables.
#[derive(Debug, Default)]
pub struct StatsState {
    current: RwLock<Arc<Snapshot>>,
}

impl StatsState {
    /// Empty state; what a process serves before its first refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the currently published snapshot.
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Replace the published snapshot wholesale.
    pub fn publish(&self, snapshot: Snapshot) {
        *self.current.write() = Arc::new(snapshot);
    }
}
