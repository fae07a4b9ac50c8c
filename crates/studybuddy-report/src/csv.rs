//! CSV export with a header row.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use studybuddy_core::model::{ExportRow, EXPORT_COLUMNS};

use crate::create_results_file;

/// Serialize `rows` as CSV into `writer`.
///
/// The header is written even when `rows` is empty.
pub fn write_rows<W: Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut csv = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        csv.serialize(row)
            .with_context(|| format!("failed to write row {}", row.question_number))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `rows` to `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.csv` and return the path.
pub fn write_results_csv(rows: &[ExportRow], dir: &Path, prefix: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create results directory {}", dir.display()))?;
    let (path, file) = create_results_file(dir, prefix, Local::now(), "csv")
        .with_context(|| format!("failed to create results file in {}", dir.display()))?;
    write_rows(rows, file).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
