//! Run Orchestration
//!
//! Fans the sensor catalog out over a small worker pool. Sensors are
//! independent units of work; the only shared mutable state is the result
//! sink behind a mutex. Every remote failure is soft - the run always
//! completes with whatever could be classified.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::logic::catalog::SensorCatalog;
use crate::logic::classify::{self, ReportRow, SensorEvaluation, SensorMetadata};
use crate::logic::prtg::PrtgError;
use crate::logic::report::{Report, ReportAssembler};
use crate::logic::series::{Series, SeriesError, SeriesQuery};

/// Per-sensor data access used by the evaluation pipeline.
///
/// Implemented by the PRTG client; tests substitute in-memory fixtures.
/// Implementations must be safe for concurrent use by multiple workers.
pub trait SensorDataSource: Sync {
    fn warning_limit(&self, id: &str) -> Result<Option<f64>, PrtgError>;
    fn traffic_series(&self, id: &str, query: &SeriesQuery) -> Result<Series, SeriesError>;
    fn sensor_metadata(&self, id: &str) -> Result<SensorMetadata, PrtgError>;
}

/// Evaluate every sensor in the catalog and assemble the ordered report.
///
/// `concurrency` = 1 gives the sequential reference behavior; any higher
/// value only changes wall-clock time, never report content or order.
pub fn run_report<S: SensorDataSource>(
    source: &S,
    catalog: &SensorCatalog,
    query: &SeriesQuery,
    concurrency: usize,
) -> Report {
    let ids = catalog.ids();
    let workers = concurrency.clamp(1, ids.len().max(1));
    let cursor = AtomicUsize::new(0);
    let assembler = Mutex::new(ReportAssembler::new());

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                if index >= ids.len() {
                    break;
                }
                let rows = evaluate_sensor(source, &ids[index], query);
                assembler.lock().push(index, rows);
            });
        }
    });

    assembler.into_inner().finish()
}

/// Fetch, normalize and classify one sensor. Never fails: soft errors
/// degrade into the states the classification rules define for them.
fn evaluate_sensor<S: SensorDataSource>(
    source: &S,
    id: &str,
    query: &SeriesQuery,
) -> Vec<ReportRow> {
    let limit = match source.warning_limit(id) {
        Ok(limit) => limit,
        Err(e) => {
            // Unavailable behaves exactly like not configured
            log::warn!("Warning limit unavailable for sensor {}: {}", id, e);
            None
        }
    };

    let series = if limit.is_some() {
        match source.traffic_series(id, query) {
            Ok(series) => {
                if series.dropped > 0 {
                    log::debug!(
                        "Sensor {}: dropped {} unparseable samples",
                        id,
                        series.dropped
                    );
                }
                Ok(series)
            }
            Err(e) => {
                log::warn!("Skipping sensor {}: {}", id, e);
                Err(e)
            }
        }
    } else {
        // Never consulted on the no-limit path
        Ok(Series::default())
    };

    let metadata = if limit.is_some() && series.is_err() {
        // The sensor produces no rows; don't bother the server for names
        SensorMetadata::default()
    } else {
        match source.sensor_metadata(id) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Metadata unavailable for sensor {}: {}", id, e);
                SensorMetadata::default()
            }
        }
    };

    classify::classify(&SensorEvaluation {
        sensor_id: id.to_string(),
        limit,
        series,
        metadata,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::classify::Classification;
    use crate::logic::series::Sample;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FixtureSource {
        limits: HashMap<String, Result<Option<f64>, PrtgError>>,
        series: HashMap<String, Result<Series, SeriesError>>,
        metadata: HashMap<String, SensorMetadata>,
    }

    impl FixtureSource {
        fn with_limit(mut self, id: &str, limit: Result<Option<f64>, PrtgError>) -> Self {
            self.limits.insert(id.to_string(), limit);
            self
        }

        fn with_series(mut self, id: &str, series: Result<Series, SeriesError>) -> Self {
            self.series.insert(id.to_string(), series);
            self
        }

        fn with_metadata(mut self, id: &str, device: &str, sensor: &str) -> Self {
            self.metadata.insert(
                id.to_string(),
                SensorMetadata {
                    device_name: device.to_string(),
                    device_id: "9".to_string(),
                    sensor_name: sensor.to_string(),
                },
            );
            self
        }
    }

    impl SensorDataSource for FixtureSource {
        fn warning_limit(&self, id: &str) -> Result<Option<f64>, PrtgError> {
            self.limits.get(id).cloned().unwrap_or(Ok(None))
        }

        fn traffic_series(&self, id: &str, _query: &SeriesQuery) -> Result<Series, SeriesError> {
            self.series
                .get(id)
                .cloned()
                .unwrap_or_else(|| Ok(Series::default()))
        }

        fn sensor_metadata(&self, id: &str) -> Result<SensorMetadata, PrtgError> {
            self.metadata
                .get(id)
                .cloned()
                .ok_or_else(|| PrtgError::Status(404))
        }
    }

    fn series(samples: &[(&str, f64)]) -> Series {
        Series {
            samples: samples
                .iter()
                .map(|(date, value)| Sample {
                    date: date.to_string(),
                    value: *value,
                })
                .collect(),
            dropped: 0,
        }
    }

    fn query() -> SeriesQuery {
        SeriesQuery {
            averaging: "3600".to_string(),
            start_date: "2024-01-01-00-00-00".to_string(),
            end_date: "2024-01-31-23-59-59".to_string(),
        }
    }

    fn catalog(ids: &[&str]) -> SensorCatalog {
        SensorCatalog::collect(ids.iter().map(|s| s.to_string()))
    }

    fn fixture() -> FixtureSource {
        FixtureSource::default()
            .with_limit("42", Ok(Some(100.0)))
            .with_series("42", Ok(series(&[("t1", 50.0), ("t2", 150.0), ("t3", 80.0)])))
            .with_metadata("42", "core-sw-01", "Port 7")
            .with_limit("43", Ok(Some(200.0)))
            .with_series("43", Ok(series(&[("t1", 50.0), ("t2", 150.0)])))
            .with_metadata("43", "core-sw-01", "Port 9")
            .with_limit("44", Ok(None))
            .with_metadata("44", "edge-rtr-02", "Port 1")
    }

    #[test]
    fn test_report_follows_catalog_order() {
        let report = run_report(&fixture(), &catalog(&["42", "43", "44"]), &query(), 3);

        let rows = report.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].sensor_id, "42");
        assert_eq!(rows[0].classification, Classification::Breach);
        assert_eq!(rows[0].date, "t2");
        assert_eq!(rows[1].sensor_id, "43");
        assert_eq!(rows[1].classification, Classification::NotBreach);
        assert_eq!(rows[1].traffic_total, "150");
        assert_eq!(rows[2].sensor_id, "44");
        assert_eq!(rows[2].classification, Classification::NoLimitSet);
    }

    #[test]
    fn test_concurrency_does_not_change_report() {
        let source = fixture();
        let ids = catalog(&["42", "43", "44"]);
        let sequential = run_report(&source, &ids, &query(), 1);
        let parallel = run_report(&source, &ids, &query(), 8);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_limit_fetch_failure_becomes_no_limit_row() {
        let source = FixtureSource::default()
            .with_limit("42", Err(PrtgError::Network("timed out".to_string())))
            .with_metadata("42", "core-sw-01", "Port 7");

        let report = run_report(&source, &catalog(&["42"]), &query(), 1);
        assert_eq!(report.len(), 1);
        assert_eq!(report.rows()[0].classification, Classification::NoLimitSet);
        assert_eq!(report.rows()[0].date, "NA");
    }

    #[test]
    fn test_series_failures_skip_sensor_without_aborting_run() {
        let source = fixture()
            .with_series("42", Err(SeriesError::Transport("503".to_string())))
            .with_limit("45", Ok(Some(10.0)))
            .with_series(
                "45",
                Err(SeriesError::MissingColumn("Traffic Total (Speed)".to_string())),
            )
            .with_metadata("45", "edge-rtr-02", "Port 3");

        let report = run_report(&source, &catalog(&["42", "43", "45"]), &query(), 2);

        // 42 and 45 contribute nothing; 43 still classifies
        assert_eq!(report.len(), 1);
        assert_eq!(report.rows()[0].sensor_id, "43");
    }

    #[test]
    fn test_metadata_failure_falls_back_to_na() {
        let source = FixtureSource::default()
            .with_limit("42", Ok(Some(100.0)))
            .with_series("42", Ok(series(&[("t1", 150.0)])));

        let report = run_report(&source, &catalog(&["42"]), &query(), 1);
        let row = &report.rows()[0];
        assert_eq!(row.device_name, "N/A");
        assert_eq!(row.device_id, "N/A");
        assert_eq!(row.sensor_name, "N/A");
        assert_eq!(row.classification, Classification::Breach);
    }

    #[test]
    fn test_identical_inputs_yield_identical_reports() {
        let source = fixture();
        let ids = catalog(&["42", "43", "44"]);
        let first = run_report(&source, &ids, &query(), 4);
        let second = run_report(&source, &ids, &query(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_catalog_yields_empty_report() {
        let report = run_report(&fixture(), &catalog(&[]), &query(), 4);
        assert!(report.is_empty());
    }
}
