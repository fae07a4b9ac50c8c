//! JSON export of result rows.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use studybuddy_core::model::ExportRow;

use crate::create_results_file;

/// Write `rows` as a pretty-printed JSON array to `path`.
pub fn write_json(rows: &[ExportRow], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(rows).context("failed to serialize results")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}

/// Write `rows` to `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.json` and return the path.
pub fn write_results_json(rows: &[ExportRow], dir: &Path, prefix: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create results directory {}", dir.display()))?;
    let (path, file) = create_results_file(dir, prefix, Local::now(), "json")
        .with_context(|| format!("failed to create results file in {}", dir.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows)
        .and_then(|()| writer.flush().map_err(serde_json::Error::io))
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(path)
}
