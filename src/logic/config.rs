//! Configuration Loading
//!
//! Typed views over the two key=value input files driving a run:
//! `server_address.txt` (endpoint + credentials) and `min_max_flags.txt`
//! (averaging interval, date range, manually pinned sensor ids). Everything
//! is validated at construction so the pipeline never sees a half-formed
//! configuration.

use std::fs;

use crate::logic::series::SeriesQuery;

/// Keys with this prefix in the flags file are sensor ids, not flags
const ID_PREFIX: &str = "id";

/// PRTG endpoint and credentials
#[derive(Debug, Clone)]
pub struct ServerParams {
    pub server: String,
    pub username: String,
    pub passhash: String,
}

/// Per-run report parameters
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Averaging interval, passed through verbatim (`avg`)
    pub averaging: String,
    /// Range start, passed through verbatim (`sdate`)
    pub start_date: String,
    /// Range end, passed through verbatim (`edate`)
    pub end_date: String,
    /// Sensor ids pinned in the flags file, in file order
    pub manual_ids: Vec<String>,
}

/// Configuration errors - the only fatal error class in the program
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io { file: String, message: String },
    MissingKey { file: String, key: String },
    EmptyCatalog,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { file, message } => write!(f, "Cannot read {}: {}", file, message),
            Self::MissingKey { file, key } => write!(f, "{} is missing required key '{}'", file, key),
            Self::EmptyCatalog => write!(
                f,
                "No sensor ids to evaluate (topology scan empty and no ids in the flags file)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerParams {
    /// Load endpoint and credentials from a key=value file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let pairs = read_kv_file(path)?;
        Ok(Self {
            server: require(&pairs, path, "server")?,
            username: require(&pairs, path, "username")?,
            passhash: require(&pairs, path, "passhash")?,
        })
    }
}

impl RunConfig {
    /// Load run flags and pinned sensor ids from a key=value file.
    ///
    /// `idN=...` lines accumulate into `manual_ids` in file order; all other
    /// keys are flags, of which `avg`, `sdate` and `edate` are required.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let pairs = read_kv_file(path)?;

        let manual_ids = pairs
            .iter()
            .filter(|(key, _)| key.starts_with(ID_PREFIX))
            .map(|(_, value)| value.clone())
            .collect();

        let flags: Vec<(String, String)> = pairs
            .into_iter()
            .filter(|(key, _)| !key.starts_with(ID_PREFIX))
            .collect();

        Ok(Self {
            averaging: require(&flags, path, "avg")?,
            start_date: require(&flags, path, "sdate")?,
            end_date: require(&flags, path, "edate")?,
            manual_ids,
        })
    }

    /// Query parameters for the historic-data endpoint
    pub fn query(&self) -> SeriesQuery {
        SeriesQuery {
            averaging: self.averaging.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

/// Parse `key=value` lines, skipping blank lines and lines without '='.
fn parse_kv_lines(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn read_kv_file(path: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        file: path.to_string(),
        message: e.to_string(),
    })?;
    Ok(parse_kv_lines(&content))
}

fn require(pairs: &[(String, String)], file: &str, key: &str) -> Result<String, ConfigError> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingKey {
            file: file.to_string(),
            key: key.to_string(),
        })
}
