//! Core table types, breakdown parsing, and metric derivation for the
//! COVID-GR stats pipeline.

pub mod breakdown;
pub mod error;
pub mod tables;
pub mod transform;

pub use breakdown::Breakdown;
pub use error::{Error, Result};
pub use tables::*;
pub use transform::*;
