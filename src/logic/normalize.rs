//! Numeric Normalization
//!
//! Shared parsing contract for threshold and series values. PRTG hands
//! measurements back as text in whatever shape the channel is configured
//! with ("1,234 kbit/s", "0.57", ""), so every value goes through the same
//! extraction before any comparison happens.

use once_cell::sync::Lazy;
use regex::Regex;

/// Numeric token: integer or decimal, no sign, no exponent
static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").unwrap());

/// Extract a measurement value from raw PRTG text.
///
/// Thousands separators are stripped first, then the first numeric token is
/// parsed as `f64`. No token means `None` - an unparseable value is never an
/// error, the sample simply does not exist.
pub fn parse_value(raw: &str) -> Option<f64> {
    let stripped = raw.replace(',', "");
    let token = NUMBER_TOKEN.find(&stripped)?;
    token.as_str().parse::<f64>().ok()
}

/// Fixed byte/s to Mbit/s transform applied to warning limits at ingestion.
/// Must stay bit-exact for comparability with historical reports.
pub fn bytes_to_megabits(raw: f64) -> f64 {
    raw * 8.0 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse_value("12500000"), Some(12_500_000.0));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(parse_value("0.57"), Some(0.57));
    }

    #[test]
    fn test_thousands_separators_and_unit() {
        assert_eq!(parse_value("1,234 kbit/s"), Some(1234.0));
        assert_eq!(parse_value("12,345,678"), Some(12_345_678.0));
    }

    #[test]
    fn test_trailing_text() {
        assert_eq!(parse_value("42.5 Mbit/s (avg)"), Some(42.5));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("No data"), None);
        assert_eq!(parse_value("-"), None);
    }

    #[test]
    fn test_zero_is_a_value() {
        assert_eq!(parse_value("0"), Some(0.0));
    }

    #[test]
    fn test_bytes_to_megabits() {
        assert_eq!(bytes_to_megabits(1_000_000.0), 8.0);
        assert_eq!(bytes_to_megabits(0.0), 0.0);
        // 12.5 MB/s line rate = 100 Mbit/s
        assert_eq!(bytes_to_megabits(12_500_000.0), 100.0);
    }
}
