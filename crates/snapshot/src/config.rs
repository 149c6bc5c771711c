//! Snapshot storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the snapshot store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Directory holding the per-table CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}
