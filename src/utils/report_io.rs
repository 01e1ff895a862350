//! Reading and writing search term report CSV files
//!
//! Exported reports start with a preamble (report name, date range, ...)
//! before the real header row, so the reader scans for the first row holding
//! every header marker and treats that as the header.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::config::AuditConfig;
use crate::core::pipeline::{AuditPipeline, RowOutcome};
use crate::error::{AuditError, Result};

/// Counters for one audited report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Data rows after the header, blank lines included
    pub rows_read: u64,
    pub rows_written: u64,
    pub rows_filtered: u64,
    pub rows_skipped: u64,
    pub rows_malformed: u64,
}

/// Decode one CSV field, dropping bytes that are not valid UTF-8
fn decode_field(field: &[u8]) -> String {
    match std::str::from_utf8(field) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(field).replace('\u{FFFD}', ""),
    }
}

fn decode_record(record: &csv::ByteRecord) -> Vec<String> {
    let mut cells: Vec<String> = record.iter().map(decode_field).collect();
    if let Some(first) = cells.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{FEFF}') {
            *first = stripped.to_string();
        }
    }
    cells
}

/// Row source positioned just after the discovered header
pub struct ReportReader<R: Read> {
    reader: csv::Reader<R>,
    header: Vec<String>,
    record: csv::ByteRecord,
}

impl<R: Read> ReportReader<R> {
    /// Scan `source` for the header row. `name` is only used in errors.
    pub fn new(source: R, markers: &[String], name: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);
        let mut record = csv::ByteRecord::new();

        while reader.read_byte_record(&mut record)? {
            let cells = decode_record(&record);
            if markers.iter().all(|marker| cells.contains(marker)) {
                return Ok(Self {
                    reader,
                    header: cells,
                    record,
                });
            }
        }

        Err(AuditError::HeaderNotFound {
            file: name.to_string(),
            markers: markers.join(", "),
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Next data row with its 1-based line number in the source.
    pub fn next_row(&mut self) -> Result<Option<(u64, Vec<String>)>> {
        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        let line = self.record.position().map(|p| p.line()).unwrap_or(0);
        Ok(Some((line, decode_record(&self.record))))
    }
}

/// Run every row of `reader` through `pipeline`, writing audited rows to
/// `writer`. The header must already have been checked by the pipeline.
pub fn audit_rows<R: Read, W: Write>(
    reader: &mut ReportReader<R>,
    pipeline: &AuditPipeline,
    writer: &mut csv::Writer<W>,
) -> Result<ReportSummary> {
    let mut summary = ReportSummary::default();
    writer.write_record(pipeline.output_header())?;

    while let Some((line, row)) = reader.next_row()? {
        summary.rows_read += 1;
        match pipeline.process_row(&row, line)? {
            RowOutcome::Audited(cells) => {
                writer.write_record(&cells)?;
                summary.rows_written += 1;
            }
            RowOutcome::Filtered { .. } => summary.rows_filtered += 1,
            RowOutcome::Blank => summary.rows_skipped += 1,
            RowOutcome::Malformed(_) => summary.rows_malformed += 1,
        }
    }

    writer.flush()?;
    Ok(summary)
}

/// Audit one report file into `output`.
///
/// Header problems are reported before `output` is created. If a row fails
/// after that, the partial output file is removed.
pub fn audit_report(input: &Path, output: &Path, config: &AuditConfig) -> Result<ReportSummary> {
    info!("Auditing {}", input.display());

    let file = File::open(input)?;
    let name = input.display().to_string();
    let mut reader = ReportReader::new(file, &config.header_markers, &name)?;
    let pipeline = AuditPipeline::new(config, reader.header())?;

    // Rows may be longer or shorter than the header
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(output)?;
    match audit_rows(&mut reader, &pipeline, &mut writer) {
        Ok(mut summary) => {
            summary.input = input.to_path_buf();
            summary.output = output.to_path_buf();
            info!(
                "Wrote {} of {} rows to {} ({} above ceiling)",
                summary.rows_written,
                summary.rows_read,
                output.display(),
                summary.rows_filtered
            );
            Ok(summary)
        }
        Err(e) => {
            drop(writer);
            if let Err(remove_err) = std::fs::remove_file(output) {
                warn!("Could not remove partial output {}: {}", output.display(), remove_err);
            } else {
                warn!("Removed partial output {}", output.display());
            }
            Err(e)
        }
    }
}
