//! PRTG API Client
//!
//! Blocking HTTP client for the PRTG REST endpoints. Credentials ride along
//! as query parameters the way the server expects them; every request uses
//! the shared agent and its configured timeout.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::logic::classify::{SensorMetadata, NOT_AVAILABLE};
use crate::logic::config::ServerParams;
use crate::logic::normalize;
use crate::logic::runner::SensorDataSource;
use crate::logic::series::{self, Series, SeriesError, SeriesQuery};

/// Payload of a getobjectproperty response
static RESULT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<result>([^<]*)</result>").unwrap());

/// PRTG client errors
#[derive(Debug, Clone)]
pub enum PrtgError {
    Network(String),
    Status(u16),
    Parse(String),
}

impl std::fmt::Display for PrtgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::Status(code) => write!(f, "Server returned status {}", code),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for PrtgError {}

pub struct PrtgClient {
    params: ServerParams,
    agent: ureq::Agent,
}

impl PrtgClient {
    pub fn new(params: ServerParams, timeout_secs: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();
        Self { params, agent }
    }

    fn get(&self, url: &str) -> Result<String, PrtgError> {
        match self.agent.get(url).call() {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| PrtgError::Parse(e.to_string())),
            Err(ureq::Error::Status(code, _)) => Err(PrtgError::Status(code)),
            Err(e) => Err(PrtgError::Network(e.to_string())),
        }
    }

    /// Fetch the full sensor topology document.
    pub fn sensor_tree(&self) -> Result<String, PrtgError> {
        let url = format!(
            "https://{}/api/table.xml?content=sensortree&username={}&passhash={}",
            self.params.server, self.params.username, self.params.passhash
        );
        self.get(&url)
    }

    /// Fetch the channel upper warning limit, converted to Mbit/s.
    ///
    /// An unset, empty or non-numeric limit is `Ok(None)` - only transport
    /// and HTTP failures are errors, and the caller treats those the same
    /// way as `None` anyway.
    pub fn warning_limit(&self, id: &str) -> Result<Option<f64>, PrtgError> {
        let url = format!(
            "https://{}/api/getobjectproperty.htm?subtype=channel&id={}&subid=-1&name=limitmaxwarning&show=nohtmlencode&username={}&passhash={}",
            self.params.server, id, self.params.username, self.params.passhash
        );
        let body = self.get(&url)?;
        Ok(parse_limit_response(&body))
    }

    /// Fetch the historic traffic series over the configured window.
    pub fn traffic_series(&self, id: &str, query: &SeriesQuery) -> Result<Series, SeriesError> {
        let url = format!(
            "https://{}/api/historicdata.csv?id={}&avg={}&sdate={}&edate={}&username={}&passhash={}",
            self.params.server,
            id,
            query.averaging,
            query.start_date,
            query.end_date,
            self.params.username,
            self.params.passhash
        );
        let body = self
            .get(&url)
            .map_err(|e| SeriesError::Transport(e.to_string()))?;
        series::parse_historic_csv(&body)
    }

    /// Fetch device and sensor naming metadata.
    pub fn sensor_metadata(&self, id: &str) -> Result<SensorMetadata, PrtgError> {
        let url = format!(
            "https://{}/api/getsensordetails.json?id={}&username={}&passhash={}",
            self.params.server, id, self.params.username, self.params.passhash
        );
        let body = self.get(&url)?;
        let details: SensorDetailsResponse =
            serde_json::from_str(&body).map_err(|e| PrtgError::Parse(e.to_string()))?;
        Ok(details.sensordata.into_metadata())
    }
}

impl SensorDataSource for PrtgClient {
    fn warning_limit(&self, id: &str) -> Result<Option<f64>, PrtgError> {
        PrtgClient::warning_limit(self, id)
    }

    fn traffic_series(&self, id: &str, query: &SeriesQuery) -> Result<Series, SeriesError> {
        PrtgClient::traffic_series(self, id, query)
    }

    fn sensor_metadata(&self, id: &str) -> Result<SensorMetadata, PrtgError> {
        PrtgClient::sensor_metadata(self, id)
    }
}

/// Extract and convert the warning limit out of a getobjectproperty body.
fn parse_limit_response(body: &str) -> Option<f64> {
    let raw = RESULT_TAG.captures(body)?;
    normalize::parse_value(&raw[1]).map(normalize::bytes_to_megabits)
}

// ============================================================================
// RESPONSE TYPES
// ============================================================================

/// Shape of getsensordetails.json
#[derive(Debug, Deserialize)]
struct SensorDetailsResponse {
    sensordata: SensorData,
}

#[derive(Debug, Default, Deserialize)]
struct SensorData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parentdevicename: Option<String>,
    // The server is inconsistent about whether this is a string or a number
    #[serde(default)]
    parentdeviceid: Option<serde_json::Value>,
}

impl SensorData {
    fn into_metadata(self) -> SensorMetadata {
        SensorMetadata {
            device_name: text_or_fallback(self.parentdevicename),
            device_id: self
                .parentdeviceid
                .map(json_value_text)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            sensor_name: text_or_fallback(self.name),
        }
    }
}

fn text_or_fallback(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn json_value_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
