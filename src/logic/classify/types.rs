//! Classification Types
//!
//! Data shapes only - the decision logic lives in classifier.rs.

use crate::logic::series::{Series, SeriesError};

/// Fallback literal for fields the server could not supply
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Three-way sensor classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// At least one sample exceeded the warning limit
    Breach,
    /// No sample exceeded the warning limit
    NotBreach,
    /// No usable upper warning limit configured on the channel
    NoLimitSet,
}

impl Classification {
    /// Verbatim report labels. Downstream consumers key grouping and
    /// styling off these exact strings, so they never change.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Breach => "Breach",
            Classification::NotBreach => "Not breach",
            Classification::NoLimitSet => "Upper Warning Limit Not Set",
        }
    }

    /// CSS class used by the HTML summary
    pub fn color(&self) -> &'static str {
        match self {
            Classification::Breach => "red",
            Classification::NotBreach => "green",
            Classification::NoLimitSet => "brown",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SENSOR METADATA
// ============================================================================

/// Device and sensor naming details, opaque passthrough from the server
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMetadata {
    pub device_name: String,
    pub device_id: String,
    pub sensor_name: String,
}

impl Default for SensorMetadata {
    fn default() -> Self {
        Self {
            device_name: NOT_AVAILABLE.to_string(),
            device_id: NOT_AVAILABLE.to_string(),
            sensor_name: NOT_AVAILABLE.to_string(),
        }
    }
}

// ============================================================================
// EVALUATION INPUT
// ============================================================================

/// Everything the classifier needs for one sensor, fetched up front
#[derive(Debug, Clone)]
pub struct SensorEvaluation {
    pub sensor_id: String,
    /// Upper warning limit in Mbit/s. None = not configured or unavailable,
    /// which are indistinguishable downstream.
    pub limit: Option<f64>,
    pub series: Result<Series, SeriesError>,
    pub metadata: SensorMetadata,
}

// ============================================================================
// REPORT ROW
// ============================================================================

/// One line of the final report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub device_name: String,
    pub device_id: String,
    pub sensor_name: String,
    pub sensor_id: String,
    pub date: String,
    pub classification: Classification,
    pub traffic_total: String,
}
