//! Sensor Classifier
//!
//! Turns one fully-fetched sensor evaluation into zero or more report rows.
//! Deterministic: identical inputs always yield identical rows in identical
//! order, whatever concurrency the run used.

use super::types::{Classification, ReportRow, SensorEvaluation, NOT_AVAILABLE};
use crate::logic::series::{Sample, Series};

/// Classify one sensor.
///
/// - No usable warning limit: exactly one "Upper Warning Limit Not Set" row,
///   regardless of series content.
/// - Series unavailable: zero rows, the sensor is skipped.
/// - Samples strictly above the limit: one "Breach" row per breaching
///   sample, in series order.
/// - Otherwise: one "Not breach" row carrying the series peak.
pub fn classify(eval: &SensorEvaluation) -> Vec<ReportRow> {
    let limit = match eval.limit {
        Some(limit) => limit,
        None => return vec![no_limit_row(eval)],
    };

    let series = match &eval.series {
        Ok(series) => series,
        Err(_) => return Vec::new(),
    };

    let breaching: Vec<&Sample> = series.samples.iter().filter(|s| s.value > limit).collect();

    if !breaching.is_empty() {
        return breaching
            .into_iter()
            .map(|sample| {
                row(
                    eval,
                    Classification::Breach,
                    sample.date.clone(),
                    format_traffic(sample.value),
                )
            })
            .collect();
    }

    vec![peak_row(eval, series)]
}

/// "Not breach" row carrying the maximum observed value. On ties the first
/// occurrence wins, so the row is stable across runs.
fn peak_row(eval: &SensorEvaluation, series: &Series) -> ReportRow {
    let mut peak: Option<&Sample> = None;
    for sample in &series.samples {
        match peak {
            Some(best) if sample.value <= best.value => {}
            _ => peak = Some(sample),
        }
    }

    match peak {
        Some(sample) => row(
            eval,
            Classification::NotBreach,
            sample.date.clone(),
            format_traffic(sample.value),
        ),
        // Zero valid samples: no date to report, traffic cell stays empty
        None => row(
            eval,
            Classification::NotBreach,
            NOT_AVAILABLE.to_string(),
            String::new(),
        ),
    }
}

fn no_limit_row(eval: &SensorEvaluation) -> ReportRow {
    // Historical reports carry "NA" (not "N/A") in this row's date column
    row(
        eval,
        Classification::NoLimitSet,
        "NA".to_string(),
        NOT_AVAILABLE.to_string(),
    )
}

fn row(
    eval: &SensorEvaluation,
    classification: Classification,
    date: String,
    traffic_total: String,
) -> ReportRow {
    ReportRow {
        device_name: eval.metadata.device_name.clone(),
        device_id: eval.metadata.device_id.clone(),
        sensor_name: eval.metadata.sensor_name.clone(),
        sensor_id: eval.sensor_id.clone(),
        date,
        classification,
        traffic_total,
    }
}

fn format_traffic(value: f64) -> String {
    value.to_string()
}

// ============================================================================
// TESTS
// ============================================================================
