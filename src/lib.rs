//! Search Term Auditor - flags ad keywords that trigger on divergent search terms
//!
//! For every keyword / search term pair in a search term report the auditor
//! computes a similarity ratio, the words the search term dropped, and match
//! type specific anomalies, then writes the report back out with those
//! diagnostics appended.

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::config::AuditConfig;
pub use crate::core::pipeline::{AnalysisResult, AuditPipeline, RowInput};
pub use crate::error::{AuditError, Result};
pub use crate::utils::report_io::ReportSummary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a single keyword / search term pair with default settings
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `match_type` - Raw `BidMatchType` value (`Exact`, `Phrase`, `Broad`, ...)
/// * `keyword` - Keyword as written in the report, decoration included
/// * `search_term` - Search term that triggered the ad
pub fn analyze_pair(match_type: &str, keyword: &str, search_term: &str) -> Result<AnalysisResult> {
    let config = AuditConfig::default();
    let header: Vec<String> = crate::core::pipeline::Column::ALL
        .iter()
        .map(|column| column.name().to_string())
        .collect();
    let input = RowInput::new(match_type, keyword, search_term, 0.0, 0.0);

    let pipeline = AuditPipeline::new(&config, &header)?;
    Ok(pipeline.analyze(&input))
}

/// Batch audit functionality
pub mod app {
    use chrono::Local;
    use log::info;
    use std::path::PathBuf;

    use crate::config::AuditConfig;
    use crate::error::Result;
    use crate::utils::file_utils;
    use crate::utils::report_io::{self, ReportSummary};

    /// Audit every report in the configured input directory
    ///
    /// Reports are processed one after another. The first error stops the
    /// run.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated audit configuration
    /// * `on_report` - Called after each report is written
    ///
    /// # Returns
    ///
    /// One summary per report
    pub fn run_audit<F>(config: &AuditConfig, on_report: F) -> Result<Vec<ReportSummary>>
    where
        F: FnMut(&ReportSummary),
    {
        config.validate()?;
        let reports = file_utils::find_reports(&config.input_directory)?;
        audit_reports(config, &reports, on_report)
    }

    /// Audit an already discovered list of reports, in order
    pub fn audit_reports<F>(
        config: &AuditConfig,
        reports: &[PathBuf],
        mut on_report: F,
    ) -> Result<Vec<ReportSummary>>
    where
        F: FnMut(&ReportSummary),
    {
        config.validate()?;
        file_utils::ensure_output_dir(&config.output_directory)?;

        info!("Auditing {} search term reports", reports.len());

        let mut summaries = Vec::with_capacity(reports.len());
        for report in reports {
            let output = file_utils::output_path_for(report, &config.output_directory, &Local::now());
            let summary = report_io::audit_report(report, &output, config)?;
            on_report(&summary);
            summaries.push(summary);
        }

        Ok(summaries)
    }
}
