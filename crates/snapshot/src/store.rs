//! Typed CSV read/write for the four tables.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use stats_core::{DailyRecord, DailyRow, Error, RawBundle, Result, Snapshot, TotalRow};

use crate::config::SnapshotConfig;

const DAILY_STATS: &str = "daily_stats";
const THREE_DAYS_STATS: &str = "three_days_stats";
const WEEKLY_STATS: &str = "weekly_stats";
const TOTAL_STATS: &str = "total_stats";

/// CSV-backed snapshot store.
///
/// Writes are not atomic: a reader racing a write can observe a partially
/// written file. Acceptable at this system's concurrency level.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            data_dir: config.data_dir,
        }
    }

    /// Persist the derived daily table.
    pub fn write_daily(&self, rows: &[DailyRow]) -> Result<()> {
        self.write_rows(&self.table_path(DAILY_STATS), rows)
    }

    /// Persist the three-day aggregate table.
    pub fn write_three_day(&self, rows: &[DailyRecord]) -> Result<()> {
        self.write_rows(&self.table_path(THREE_DAYS_STATS), rows)
    }

    /// Persist the weekly aggregate table.
    pub fn write_weekly(&self, rows: &[DailyRecord]) -> Result<()> {
        self.write_rows(&self.table_path(WEEKLY_STATS), rows)
    }

    /// Persist the all-time breakdown table.
    pub fn write_total(&self, rows: &[TotalRow]) -> Result<()> {
        self.write_rows(&self.table_path(TOTAL_STATS), rows)
    }

    /// Persist the pre-transform audit copies of all four tables.
    pub fn write_raw_bundle(&self, bundle: &RawBundle) -> Result<()> {
        self.write_rows(&self.raw_path(DAILY_STATS), &bundle.daily)?;
        self.write_rows(&self.raw_path(THREE_DAYS_STATS), &bundle.three_day)?;
        self.write_rows(&self.raw_path(WEEKLY_STATS), &bundle.weekly)?;

        // The totals arrive as a flat object, audited as key/value pairs.
        let path = self.raw_path(TOTAL_STATS);
        self.ensure_dir(&path)?;
        let mut writer = csv::Writer::from_path(&path).map_err(|e| file_error(&path, e))?;
        writer
            .write_record(["key", "value"])
            .map_err(|e| file_error(&path, e))?;
        for (key, value) in &bundle.total {
            writer
                .write_record([key.as_str(), value.to_string().as_str()])
                .map_err(|e| file_error(&path, e))?;
        }
        writer.flush().map_err(|e| file_error(&path, e))?;

        debug!(dir = %self.data_dir.display(), "raw tables persisted");
        Ok(())
    }

    /// Reload the four derived tables from their last persisted state.
    ///
    /// The files already hold derived columns, so nothing is recomputed.
    /// Any missing or unreadable file fails the whole load.
    pub fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            daily: self.read_rows(&self.table_path(DAILY_STATS))?,
            three_day: self.read_rows(&self.table_path(THREE_DAYS_STATS))?,
            weekly: self.read_rows(&self.table_path(WEEKLY_STATS))?,
            total: self.read_rows(&self.table_path(TOTAL_STATS))?,
        })
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{table}.csv"))
    }

    fn raw_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{table}-raw.csv"))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::snapshot(format!("{}: {e}", parent.display())))?;
        }
        Ok(())
    }

    fn write_rows<T: Serialize>(&self, path: &Path, rows: &[T]) -> Result<()> {
        self.ensure_dir(path)?;

        let mut writer = csv::Writer::from_path(path).map_err(|e| file_error(path, e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| file_error(path, e))?;
        }
        writer.flush().map_err(|e| file_error(path, e))?;

        Ok(())
    }

    fn read_rows<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| file_error(path, e))?;
        reader
            .deserialize()
            .collect::<std::result::Result<Vec<T>, _>>()
            .map_err(|e| file_error(path, e))
    }
}

fn file_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::snapshot(format!("{}: {err}", path.display()))
}
