//! Error types for the search term auditor
//!
//! Configuration errors carry a remediation hint because they are shown to the
//! person running the audit, not just logged.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Input directory not found: {}. Create it and add your Search Term Reports.", .0.display())]
    InputDirectoryNotFound(PathBuf),

    #[error("No CSV files detected in {}. Please add your Search Term Reports.", .0.display())]
    NoReportsFound(PathBuf),

    #[error("No header row containing all of [{markers}] found in {file}")]
    HeaderNotFound { file: String, markers: String },

    #[error("Required column '{column}' is missing from the report header")]
    MissingColumn { column: String },

    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Line {line}: row has no cell for column '{column}'")]
    MissingCell { line: u64, column: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not read configuration file {}: {reason}", .path.display())]
    ConfigFile { path: PathBuf, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// True for per-row data problems that the skip policy may recover from.
    pub fn is_malformed_row(&self) -> bool {
        matches!(
            self,
            AuditError::InvalidNumber { .. } | AuditError::MissingCell { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
