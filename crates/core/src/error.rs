//! Unified error types for the stats pipeline.
//!
//! Two families matter operationally:
//! - transient fetch errors, recovered by falling back to the last
//!   persisted snapshot;
//! - snapshot errors, fatal for a refresh cycle when no live data exists.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the stats pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure reaching the upstream source.
    #[error("upstream request failed: {0}")]
    UpstreamRequest(String),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    /// The source page held fewer script elements than expected.
    #[error("script element {index} missing ({found} script tags present)")]
    ScriptMissing { index: usize, found: usize },

    /// A stats variable assignment was not found in the script body.
    #[error("`{0}` assignment not found in script body")]
    BlobMissing(&'static str),

    /// A stats variable was present but did not decode as JSON.
    #[error("`{name}` is not valid JSON: {source}")]
    BlobMalformed {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A breakdown entry whose value cannot be read as an integer.
    #[error("breakdown key `{0}` has a non-integer value")]
    BreakdownValue(String),

    /// Snapshot files missing or unreadable.
    #[error("snapshot unavailable: {0}")]
    Snapshot(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a network-level upstream error.
    pub fn upstream_request(msg: impl Into<String>) -> Self {
        Self::UpstreamRequest(msg.into())
    }

    /// Create a snapshot persistence error.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Whether this error is recoverable by serving the last persisted
    /// snapshot instead of live data.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UpstreamRequest(_)
                | Self::UpstreamStatus(_)
                | Self::ScriptMissing { .. }
                | Self::BlobMissing(_)
                | Self::BlobMalformed { .. }
        )
    }
}
