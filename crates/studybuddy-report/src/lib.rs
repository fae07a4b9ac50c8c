//! studybuddy-report: durable export of quiz results.
//!
//! Writes the rows produced by `QuizSession::export_results` as CSV or JSON
//! under a timestamp-qualified file name.

pub mod csv;
pub mod json;

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Default file name prefix for exported results.
pub const DEFAULT_PREFIX: &str = "quiz_results";

/// `<prefix>_<YYYYMMDD_HHMMSS>.<ext>`
pub fn results_file_name(prefix: &str, timestamp: DateTime<Local>, ext: &str) -> String {
    format!("{prefix}_{}.{ext}", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Create a new file in `dir` for `prefix`/`ext` stamped with `timestamp`.
///
/// An existing file is never truncated: when the name is taken a numeric
/// suffix is tried instead (`_1`, `_2`, ...).
pub fn create_results_file(
    dir: &Path,
    prefix: &str,
    timestamp: DateTime<Local>,
    ext: &str,
) -> io::Result<(PathBuf, File)> {
    let stem = results_file_name(prefix, timestamp, "");
    let stem = stem.trim_end_matches('.');
    for n in 0u32.. {
        let path = if n == 0 {
            dir.join(format!("{stem}.{ext}"))
        } else {
            dir.join(format!("{stem}_{n}.{ext}"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {stem}.{ext}"),
    ))
}
