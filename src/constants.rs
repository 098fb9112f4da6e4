//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a default input file or limit, only edit this file.

/// Default server parameters file (endpoint + credentials)
pub const DEFAULT_SERVER_FILE: &str = "server_address.txt";

/// Default flags file (averaging interval, date range, pinned sensor ids)
pub const DEFAULT_FLAGS_FILE: &str = "min_max_flags.txt";

/// Default directory for report artifacts
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default worker pool size
pub const DEFAULT_CONCURRENCY: usize = 4;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "prtg-breach-report";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get server parameters file path from environment or use default
pub fn get_server_file() -> String {
    std::env::var("PRTG_SERVER_FILE").unwrap_or_else(|_| DEFAULT_SERVER_FILE.to_string())
}

/// Get flags file path from environment or use default
pub fn get_flags_file() -> String {
    std::env::var("PRTG_FLAGS_FILE").unwrap_or_else(|_| DEFAULT_FLAGS_FILE.to_string())
}

/// Get output directory from environment or use default
pub fn get_output_dir() -> String {
    std::env::var("PRTG_OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
}

/// Get per-request timeout from environment or use default
pub fn get_timeout_secs() -> u64 {
    std::env::var("PRTG_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Get worker pool size from environment or use default, never below 1
pub fn get_concurrency() -> usize {
    std::env::var("PRTG_CONCURRENCY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CONCURRENCY)
        .max(1)
}
