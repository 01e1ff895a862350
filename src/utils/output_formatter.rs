//! Output formatter for audit run summaries
//!
//! This module renders the end-of-run console summary and exports the per
//! report counters as JSON.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use crate::utils::report_io::ReportSummary;

/// Format the run summary for console output
///
/// # Arguments
///
/// * `summaries` - One entry per audited report
/// * `elapsed` - Wall time of the whole run
///
/// # Returns
///
/// Formatted string for console output
pub fn format_summary(summaries: &[ReportSummary], elapsed: Duration) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", "Audit Complete".bold()));
    output.push_str(&format!("{} {}\n", "Reports audited:".green(), summaries.len()));

    let total = |field: fn(&ReportSummary) -> u64| summaries.iter().map(field).sum::<u64>();
    output.push_str(&format!("{} {}\n", "Rows read:".green(), total(|s| s.rows_read)));
    output.push_str(&format!("{} {}\n", "Rows written:".green(), total(|s| s.rows_written)));
    output.push_str(&format!("{} {}\n", "Rows above ceiling:".green(), total(|s| s.rows_filtered)));

    let malformed = total(|s| s.rows_malformed);
    if malformed > 0 {
        output.push_str(&format!("{} {}\n", "Malformed rows skipped:".yellow(), malformed));
    }
    output.push_str(&format!("{} {:.2} seconds\n", "Time elapsed:".green(), elapsed.as_secs_f64()));

    for summary in summaries {
        output.push_str(&format!(
            "  {} -> {} ({} rows)\n",
            summary.input.display().to_string().cyan(),
            summary.output.display(),
            summary.rows_written
        ));
    }

    output
}

/// Export run summaries to a JSON file
///
/// # Arguments
///
/// * `summaries` - One entry per audited report
/// * `output_path` - Path where the JSON file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn export_summary_json(summaries: &[ReportSummary], output_path: &Path) -> Result<()> {
    let document = json!({
        "reports": summaries,
        "rows_written": summaries.iter().map(|s| s.rows_written).sum::<u64>(),
    });

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON summary file: {}", output_path.display()))?;
    let text = serde_json::to_string_pretty(&document).context("Failed to serialize summary")?;
    file.write_all(text.as_bytes())
        .context(format!("Failed to write JSON summary: {}", output_path.display()))?;

    Ok(())
}
