//! PRTG Traffic Breach Reporter - Main Entry Point

mod logic;
pub mod constants;

use std::path::Path;
use std::process::ExitCode;

use logic::catalog::SensorCatalog;
use logic::config::{ConfigError, RunConfig, ServerParams};
use logic::prtg::{sensor_tree, PrtgClient};
use logic::report::{csv, html};
use logic::runner;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // First CLI argument selects the server parameters file, so one install
    // can report against several PRTG instances
    let server_file = std::env::args()
        .nth(1)
        .unwrap_or_else(constants::get_server_file);

    let server = ServerParams::load(&server_file)?;
    let config = RunConfig::load(&constants::get_flags_file())?;

    log::info!("Reporting against {}", server.server);

    let client = PrtgClient::new(server, constants::get_timeout_secs());

    // Topology-derived ids; a failed tree fetch leaves the pinned list intact
    let tree_ids = match client.sensor_tree() {
        Ok(xml) => sensor_tree::snmp_traffic_sensor_ids(&xml),
        Err(e) => {
            log::warn!("Sensor tree unavailable: {}", e);
            Vec::new()
        }
    };
    log::info!("{} SNMP Traffic sensors discovered in topology", tree_ids.len());

    let catalog = SensorCatalog::collect(config.manual_ids.iter().cloned().chain(tree_ids));
    if catalog.is_empty() {
        return Err(ConfigError::EmptyCatalog.into());
    }
    log::info!("Evaluating {} sensors", catalog.len());

    let report = runner::run_report(
        &client,
        &catalog,
        &config.query(),
        constants::get_concurrency(),
    );
    log::info!("Report assembled: {} rows", report.len());

    let out_dir = constants::get_output_dir();
    let csv_path = csv::write_csv(&report, Path::new(&out_dir))?;
    log::info!("CSV written to {}", csv_path.display());

    let html_path = html::write_html(&report, Path::new(&out_dir))?;
    log::info!("HTML summary written to {}", html_path.display());

    Ok(())
}
