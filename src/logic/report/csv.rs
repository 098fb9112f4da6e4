//! CSV Artifact Writer

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use super::{Report, COLUMNS};

/// Write the report as a timestamped CSV under `dir`, returning the path.
pub fn write_csv(report: &Report, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let filename = format!("output_{}.csv", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let path = dir.join(filename);

    let mut file = File::create(&path)?;
    write_table(report, &mut file)?;
    file.flush()?;

    Ok(path)
}

/// Serialize the table to any writer: header first, one line per row.
pub fn write_table<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", COLUMNS.join(","))?;
    for row in report.to_table() {
        let fields: Vec<String> = row.iter().map(|f| escape_field(f)).collect();
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Quote a field when it carries separators, quotes or line breaks.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
