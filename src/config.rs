//! Audit configuration
//!
//! One immutable `AuditConfig` is built at startup (defaults, then an optional
//! JSON file, then command line overrides) and handed to every report.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::core::lexical_diff::WordContainment;
use crate::core::stop_words::{StopWords, DEFAULT_STOP_WORDS};
use crate::error::{AuditError, Result};

/// Cells that identify the real header row of a report
pub const DEFAULT_HEADER_MARKERS: [&str; 3] = ["SearchQuery", "Keyword", "Bid match type"];

/// Names of the diagnostic columns appended to every audited row
pub const NEW_COLUMNS: [&str; 11] = [
    "Diff Ratio",
    "Clicks Weighted Diff Ratio",
    "Impressions Weighted Diff Ratio",
    "Word Count Diff",
    "Dropped Words",
    "Dropped Stop Word Count",
    "Dropped Stop Words",
    "Kw Acronym in Search Term",
    "Phrase Missing",
    "Dropped BMM Anchor Count",
    "Dropped BMM Anchors",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    /// Rows whose similarity ratio is above this value are left out
    pub similarity_ceiling: f64,
    pub stop_words: Vec<String>,
    pub header_markers: Vec<String>,
    pub new_columns: Vec<String>,
    pub word_containment: WordContainment,
    /// Skip rows with bad numbers or missing cells instead of aborting
    pub skip_malformed_rows: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from("input"),
            output_directory: PathBuf::from("output"),
            similarity_ceiling: 1.0,
            stop_words: to_strings(DEFAULT_STOP_WORDS),
            header_markers: to_strings(&DEFAULT_HEADER_MARKERS),
            new_columns: to_strings(&NEW_COLUMNS),
            word_containment: WordContainment::Substring,
            skip_malformed_rows: false,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl AuditConfig {
    /// Load configuration from a JSON file. Fields the file leaves out keep
    /// their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path).map_err(|e| AuditError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: AuditConfig =
            serde_json::from_str(&config_str).map_err(|e| AuditError::ConfigFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults, or the given file when one is provided.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.similarity_ceiling.is_nan() {
            return Err(AuditError::InvalidConfig(
                "similarity ceiling must be a number".to_string(),
            ));
        }
        if self.similarity_ceiling < 0.0 {
            warn!(
                "Similarity ceiling {} is below zero, every row will be filtered out",
                self.similarity_ceiling
            );
        }
        if self.header_markers.is_empty() {
            return Err(AuditError::InvalidConfig(
                "at least one header marker column is required".to_string(),
            ));
        }
        if self.new_columns.len() != NEW_COLUMNS.len() {
            return Err(AuditError::InvalidConfig(format!(
                "expected {} new column names, got {}",
                NEW_COLUMNS.len(),
                self.new_columns.len()
            )));
        }
        Ok(())
    }

    pub fn stop_word_set(&self) -> StopWords {
        StopWords::new(&self.stop_words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.similarity_ceiling, 1.0);
        assert_eq!(config.input_directory, PathBuf::from("input"));
        assert_eq!(config.new_columns.len(), 11);
        assert!(config.validate().is_ok());
        assert!(config.stop_word_set().contains("towards"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"similarity_ceiling": 0.6, "word_containment": "token"}}"#).unwrap();

        let config = AuditConfig::from_file(file.path()).unwrap();
        assert_eq!(config.similarity_ceiling, 0.6);
        assert_eq!(config.word_containment, WordContainment::Token);
        assert_eq!(config.output_directory, PathBuf::from("output"));
        assert_eq!(config.header_markers, to_strings(&DEFAULT_HEADER_MARKERS));
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            AuditConfig::from_file(file.path()),
            Err(AuditError::ConfigFile { .. })
        ));

        let missing = Path::new("does/not/exist.json");
        assert!(AuditConfig::load(Some(missing)).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AuditConfig {
            similarity_ceiling: f64::NAN,
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AuditConfig {
            new_columns: vec!["Diff Ratio".to_string()],
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AuditConfig {
            header_markers: Vec::new(),
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
