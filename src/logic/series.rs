//! Historic Series Decoding
//!
//! PRTG returns historic channel data as CSV text. This module locates the
//! measurement and timestamp columns, normalizes every row's value and keeps
//! the samples in source order. One bad row never poisons the rest of the
//! series; a missing measurement column fails the whole series, which the
//! caller treats as a soft skip.

use crate::logic::normalize;

/// Measurement column the report evaluates
pub const VALUE_COLUMN: &str = "Traffic Total (Speed)";

/// Timestamp column
pub const DATE_COLUMN: &str = "Date Time";

/// One (timestamp, value) measurement. The timestamp stays the raw server
/// string - the pipeline never orders or parses it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub date: String,
    pub value: f64,
}

/// Ordered samples for one sensor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub samples: Vec<Sample>,
    /// Rows whose value failed normalization
    pub dropped: usize,
}

/// Query parameters passed through verbatim to the historic-data endpoint
#[derive(Debug, Clone)]
pub struct SeriesQuery {
    pub averaging: String,
    pub start_date: String,
    pub end_date: String,
}

/// Series retrieval errors - soft at the run level, the sensor is skipped
#[derive(Debug, Clone)]
pub enum SeriesError {
    /// Fetch did not complete with a success status
    Transport(String),
    /// Expected column absent from the response
    MissingColumn(String),
}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Historic data fetch failed: {}", e),
            Self::MissingColumn(column) => write!(f, "Column '{}' not found in historic data", column),
        }
    }
}

impl std::error::Error for SeriesError {}

/// Decode a historicdata.csv body into a Series.
pub fn parse_historic_csv(body: &str) -> Result<Series, SeriesError> {
    let mut lines = body.lines();
    let header = lines.next().unwrap_or("").trim_start_matches('\u{feff}');
    let columns = split_csv_line(header);

    let value_idx = columns
        .iter()
        .position(|c| c == VALUE_COLUMN)
        .ok_or_else(|| SeriesError::MissingColumn(VALUE_COLUMN.to_string()))?;
    let date_idx = columns.iter().position(|c| c == DATE_COLUMN);

    let mut samples = Vec::new();
    let mut dropped = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(line);
        let raw = fields.get(value_idx).map(String::as_str).unwrap_or("");
        match normalize::parse_value(raw) {
            Some(value) => {
                let date = date_idx
                    .and_then(|i| fields.get(i))
                    .cloned()
                    .unwrap_or_default();
                samples.push(Sample { date, value });
            }
            None => dropped += 1,
        }
    }

    Ok(Series { samples, dropped })
}

/// Split one CSV line, honoring double-quoted fields with embedded commas
/// and doubled quotes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
