//! Sensor Tree Filtering
//!
//! The topology endpoint returns one large XML document covering every
//! group, device and sensor on the server. Some installations interleave
//! mojibake degree-sign fragments into channel names, which breaks strict
//! parsing, so the content is scrubbed first and then scanned for the
//! sensors this report covers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sensor type whose channels the report evaluates
pub const SNMP_TRAFFIC: &str = "SNMP Traffic";

static GARBLED: Lazy<Regex> =
    Lazy::new(|| Regex::new("\\(\u{FFFD}C\\)|\u{FFFD}C").unwrap());
static SENSOR_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<sensor\b[^>]*>.*?</sensor>").unwrap());
static SENSOR_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<sensortype>([^<]*)</sensortype>").unwrap());
static SENSOR_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"<id>([^<]*)</id>").unwrap());

/// Remove the broken degree-sign fragments the server interleaves into
/// channel names.
pub fn clean_content(xml: &str) -> String {
    GARBLED.replace_all(xml, "").into_owned()
}

/// Extract the ids of all SNMP Traffic sensors, in document order.
pub fn snmp_traffic_sensor_ids(xml: &str) -> Vec<String> {
    let cleaned = clean_content(xml);
    let mut ids = Vec::new();

    for block in SENSOR_BLOCK.find_iter(&cleaned) {
        let block = block.as_str();
        let is_traffic = SENSOR_TYPE
            .captures(block)
            .map(|c| c[1].trim() == SNMP_TRAFFIC)
            .unwrap_or(false);
        if !is_traffic {
            continue;
        }
        if let Some(captures) = SENSOR_ID.captures(block) {
            let id = captures[1].trim().to_string();
            if !id.is_empty() {
                ids.push(id);
            }
        }
    }

    ids
}
