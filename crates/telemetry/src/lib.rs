//! Tracing setup and component health for the stats pipeline.

pub mod health;
pub mod tracing_setup;

pub use health::*;
pub use tracing_setup::*;
