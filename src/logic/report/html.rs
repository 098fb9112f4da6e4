//! Collapsible HTML Summary
//!
//! A pure grouping transform over the immutable Report, plus the renderer
//! that turns the grouped tree into the nested collapsible list document.
//! Grouping order is Message -> Device Name -> Sensor Name -> Sensor ID,
//! each level in first-seen order so the document is stable run to run.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use super::Report;
use crate::logic::classify::Classification;

// ============================================================================
// GROUPING
// ============================================================================

#[derive(Debug, PartialEq)]
pub struct MessageGroup {
    pub classification: Classification,
    pub devices: Vec<DeviceGroup>,
}

#[derive(Debug, PartialEq)]
pub struct DeviceGroup {
    pub device_name: String,
    pub sensors: Vec<SensorNameGroup>,
}

#[derive(Debug, PartialEq)]
pub struct SensorNameGroup {
    pub sensor_name: String,
    pub ids: Vec<SensorIdGroup>,
}

#[derive(Debug, PartialEq)]
pub struct SensorIdGroup {
    pub sensor_id: String,
    /// (date, traffic total) evidence lines, in report order
    pub details: Vec<(String, String)>,
}

/// Group report rows for the nested summary.
pub fn group_rows(report: &Report) -> Vec<MessageGroup> {
    let mut groups: Vec<MessageGroup> = Vec::new();

    for row in report.rows() {
        let m = match groups
            .iter()
            .position(|g| g.classification == row.classification)
        {
            Some(m) => m,
            None => {
                groups.push(MessageGroup {
                    classification: row.classification,
                    devices: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let devices = &mut groups[m].devices;
        let d = match devices.iter().position(|d| d.device_name == row.device_name) {
            Some(d) => d,
            None => {
                devices.push(DeviceGroup {
                    device_name: row.device_name.clone(),
                    sensors: Vec::new(),
                });
                devices.len() - 1
            }
        };

        let sensors = &mut devices[d].sensors;
        let s = match sensors.iter().position(|s| s.sensor_name == row.sensor_name) {
            Some(s) => s,
            None => {
                sensors.push(SensorNameGroup {
                    sensor_name: row.sensor_name.clone(),
                    ids: Vec::new(),
                });
                sensors.len() - 1
            }
        };

        let ids = &mut sensors[s].ids;
        let i = match ids.iter().position(|i| i.sensor_id == row.sensor_id) {
            Some(i) => i,
            None => {
                ids.push(SensorIdGroup {
                    sensor_id: row.sensor_id.clone(),
                    details: Vec::new(),
                });
                ids.len() - 1
            }
        };

        ids[i]
            .details
            .push((row.date.clone(), row.traffic_total.clone()));
    }

    groups
}

// ============================================================================
// RENDERING
// ============================================================================

const HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Sensor Data Summary</title>
<style>
a:link, a:visited, a:hover, a:active {
  text-decoration: none;
}
body {
    font-family: Calibri, Arial, sans-serif;
}
ul {
    list-style-type: none;
    margin: 0;
    padding: 0;
}
li {
    padding: 10px 0;
    font-weight: bold;
}
ul ul {
    list-style-type: disc;
    margin-left: 20px;
}
ul ul ul {
    list-style-type: circle;
    margin-left: 20px;
}
ul ul ul ul {
    list-style-type: square;
    margin-left: 20px;
}
.hidden {
    display: none;
}
.red {
    color: red;
}
.green {
    color: green;
}
.brown {
    color: brown;
}
</style>
<script>
function toggleDetails(elementId) {
    var details = document.getElementById(elementId);
    details.classList.toggle('hidden');
}
</script>
</head>
<body>
<h2>Sensor Data Summary</h2>
<ul>
"#;

const FOOTER: &str = "</ul>\n</body>\n</html>\n";

/// Render the full standalone HTML document.
pub fn render(report: &Report) -> String {
    let mut html = String::from(HEADER);

    for message in group_rows(report) {
        let class = message.classification.color();
        let label = message.classification.as_str();
        let message_id = toggle_id(&[label]);

        html.push_str(&format!(
            "<li class='{class}'><a class='{class}' href='javascript:void(0)' \
             onclick=\"toggleDetails('{message_id}')\">{} ({})</a>",
            escape_text(label),
            message.devices.len()
        ));
        html.push_str(&format!(
            "<ul id='{message_id}' class='sub-list hidden {class}'>"
        ));

        for device in &message.devices {
            let device_id = toggle_id(&[label, &device.device_name]);
            html.push_str(&format!(
                "<li class='{class}'><a class='{class}' href='javascript:void(0)' \
                 onclick=\"toggleDetails('{device_id}')\">Device Name: {}</a>",
                escape_text(&device.device_name)
            ));
            html.push_str(&format!(
                "<ul id='{device_id}' class='sub-list hidden {class}'>"
            ));

            for sensor in &device.sensors {
                let sensor_id = toggle_id(&[label, &device.device_name, &sensor.sensor_name]);
                html.push_str(&format!(
                    "<li class='{class}'><a class='{class}' href='javascript:void(0)' \
                     onclick=\"toggleDetails('{sensor_id}')\">Sensor Name: {}</a>",
                    escape_text(&sensor.sensor_name)
                ));
                html.push_str(&format!(
                    "<ul id='{sensor_id}' class='sub-list hidden {class}'>"
                ));

                for id_group in &sensor.ids {
                    let detail_id = toggle_id(&[
                        label,
                        &device.device_name,
                        &sensor.sensor_name,
                        &id_group.sensor_id,
                    ]);
                    html.push_str(&format!(
                        "<li class='{class}'><a class='{class}' href='javascript:void(0)' \
                         onclick=\"toggleDetails('{detail_id}')\">Sensor ID: {}</a>",
                        escape_text(&id_group.sensor_id)
                    ));
                    html.push_str(&format!(
                        "<ul id='{detail_id}' class='sub-list hidden {class}'>"
                    ));
                    html.push_str(&format!(
                        "<li class='{class}'><strong>Dates and Traffic Total:</strong><ul>"
                    ));

                    for (date, traffic) in &id_group.details {
                        html.push_str(&format!(
                            "<li class='{class}'>{} - Traffic Total: {} Mbps</li>",
                            escape_text(date),
                            escape_text(traffic)
                        ));
                    }

                    html.push_str("</ul></li>");
                    html.push_str("</ul></li>");
                }

                html.push_str("</ul></li>");
            }

            html.push_str("</ul></li>");
        }

        html.push_str("</ul></li>\n");
    }

    html.push_str(FOOTER);
    html
}

/// Write the rendered summary as a timestamped file under `dir`.
pub fn write_html(report: &Report, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let filename = format!("output_{}.html", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let path = dir.join(filename);

    let mut file = File::create(&path)?;
    file.write_all(render(report).as_bytes())?;
    file.flush()?;

    Ok(path)
}

/// Element ids must stay attribute-safe whatever the device names contain.
fn toggle_id(parts: &[&str]) -> String {
    parts
        .join("_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::classify::ReportRow;
    use crate::logic::report::ReportAssembler;
    use tempfile::tempdir;

    fn row(
        classification: Classification,
        device: &str,
        sensor: &str,
        id: &str,
        date: &str,
        traffic: &str,
    ) -> ReportRow {
        ReportRow {
            device_name: device.to_string(),
            device_id: "1".to_string(),
            sensor_name: sensor.to_string(),
            sensor_id: id.to_string(),
            date: date.to_string(),
            classification,
            traffic_total: traffic.to_string(),
        }
    }

    fn sample_report() -> Report {
        let mut assembler = ReportAssembler::new();
        assembler.push(
            0,
            vec![
                row(Classification::Breach, "core-sw-01", "Port 7", "42", "t1", "150"),
                row(Classification::Breach, "core-sw-01", "Port 7", "42", "t3", "180"),
            ],
        );
        assembler.push(
            1,
            vec![row(Classification::NotBreach, "core-sw-01", "Port 9", "43", "t2", "90")],
        );
        assembler.push(
            2,
            vec![row(
                Classification::NoLimitSet,
                "edge-rtr-02",
                "Port 1",
                "44",
                "NA",
                "N/A",
            )],
        );
        assembler.finish()
    }

    #[test]
    fn test_grouping_nests_and_merges() {
        let groups = group_rows(&sample_report());
        assert_eq!(groups.len(), 3);

        let breach = &groups[0];
        assert_eq!(breach.classification, Classification::Breach);
        assert_eq!(breach.devices.len(), 1);
        assert_eq!(breach.devices[0].sensors[0].ids[0].details.len(), 2);
        assert_eq!(
            breach.devices[0].sensors[0].ids[0].details[0],
            ("t1".to_string(), "150".to_string())
        );
    }

    #[test]
    fn test_grouping_first_seen_order() {
        let groups = group_rows(&sample_report());
        let order: Vec<Classification> = groups.iter().map(|g| g.classification).collect();
        assert_eq!(
            order,
            vec![
                Classification::Breach,
                Classification::NotBreach,
                Classification::NoLimitSet
            ]
        );
    }

    #[test]
    fn test_render_carries_labels_classes_and_counts() {
        let html = render(&sample_report());
        assert!(html.contains("Breach (1)"));
        assert!(html.contains("Not breach (1)"));
        assert!(html.contains("Upper Warning Limit Not Set (1)"));
        assert!(html.contains("class='red'"));
        assert!(html.contains("class='green'"));
        assert!(html.contains("class='brown'"));
        assert!(html.contains("Device Name: core-sw-01"));
        assert!(html.contains("t1 - Traffic Total: 150 Mbps"));
    }

    #[test]
    fn test_render_toggle_ids_attribute_safe() {
        let mut assembler = ReportAssembler::new();
        assembler.push(
            0,
            vec![row(
                Classification::Breach,
                "rack 4's switch",
                "Port 7",
                "42",
                "t1",
                "150",
            )],
        );
        let html = render(&assembler.finish());
        assert!(html.contains("toggleDetails('Breach_rack_4_s_switch')"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut assembler = ReportAssembler::new();
        assembler.push(
            0,
            vec![row(Classification::Breach, "R&D <lab>", "Port", "42", "t1", "150")],
        );
        let html = render(&assembler.finish());
        assert!(html.contains("Device Name: R&amp;D &lt;lab&gt;"));
    }

    #[test]
    fn test_write_html_creates_timestamped_file() {
        let dir = tempdir().unwrap();
        let path = write_html(&sample_report(), dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("output_"));
        assert!(name.ends_with(".html"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.ends_with("</html>\n"));
    }
}
