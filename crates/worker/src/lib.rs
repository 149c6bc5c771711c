//! Refresh orchestration for the stats pipeline.
//!
//! - State: the published set of four tables, swapped wholesale
//! - Refresher: fetch → transform → persist → publish, snapshot fallback
//! - Scheduler: interval-driven refresh loop

pub mod refresh;
pub mod scheduler;
pub mod state;

pub use refresh::{Refresher, RefreshSource};
pub use scheduler::{RefreshScheduler, WorkerConfig};
pub use state::StatsState;
