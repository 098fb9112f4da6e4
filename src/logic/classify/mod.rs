//! Classification Module
//!
//! Decides, per sensor, whether the configured upper warning limit was
//! breached, and builds the report rows carrying the evidence.
//!
//! ## Structure
//! - `types`: Core types (Classification, SensorMetadata, ReportRow)
//! - `classifier`: Classification logic - pure, no I/O
//!
//! The runner gathers all remote inputs up front; the classifier only ever
//! sees a fully-populated `SensorEvaluation`, which keeps it deterministic
//! and testable with fixtures.

pub mod classifier;
pub mod types;

pub use classifier::classify;
pub use types::{Classification, ReportRow, SensorEvaluation, SensorMetadata, NOT_AVAILABLE};
