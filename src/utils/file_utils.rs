//! File handling utilities
//!
//! This module finds the reports to audit, prepares the output directory and
//! names output files so that a later run never overwrites an earlier one.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{AuditError, Result};

/// List the `.csv` files directly inside `dir`, sorted by name.
///
/// # Errors
///
/// `InputDirectoryNotFound` when `dir` is missing, `NoReportsFound` when it
/// holds no reports.
pub fn find_reports(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AuditError::InputDirectoryNotFound(dir.to_path_buf()));
    }

    let mut reports = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io_err) => AuditError::Io(io_err),
            None => AuditError::InputDirectoryNotFound(dir.to_path_buf()),
        })?;
        let is_report = entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(".csv");
        if is_report {
            reports.push(entry.into_path());
        } else {
            debug!("Ignoring {}", entry.path().display());
        }
    }

    if reports.is_empty() {
        return Err(AuditError::NoReportsFound(dir.to_path_buf()));
    }

    reports.sort();
    Ok(reports)
}

/// Create the output directory if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!("Created output directory {}", dir.display());
    }
    Ok(())
}

/// Timestamp embedded in output names: two digit year, month, day, hour,
/// minute, second and microseconds.
pub fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%y%m%d%H%M%S%6f").to_string()
}

/// Output path for `input`: `<stem> Audited <timestamp>.csv` inside
/// `output_dir`. A ` (n)` suffix is added if that file already exists.
pub fn output_path_for(input: &Path, output_dir: &Path, now: &DateTime<Local>) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    let stem = file_name.split(".csv").next().unwrap_or(&file_name).to_string();
    let base = format!("{} Audited {}", stem, timestamp(now));

    let mut candidate = output_dir.join(format!("{}.csv", base));
    let mut attempt = 1;
    while candidate.exists() {
        candidate = output_dir.join(format!("{} ({}).csv", base, attempt));
        attempt += 1;
    }
    candidate
}
