//! PRTG API Access
//!
//! This module handles:
//! - Blocking HTTP access to the four PRTG endpoints the report needs
//! - Scrubbing and filtering of the sensor topology document
//!
//! All failures here are soft at the per-sensor level; the runner decides
//! what each one means for the report.

pub mod client;
pub mod sensor_tree;

pub use client::{PrtgClient, PrtgError};
