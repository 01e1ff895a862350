//! Per row audit pipeline
//!
//! `AuditPipeline` is built once per report from the discovered header. It
//! resolves the required columns up front, then turns each data row into
//! either an audited row (original cells plus diagnostic cells) or a reason
//! the row was left out.

use log::{debug, warn};

use crate::config::AuditConfig;
use crate::core::anomaly::{self, AnchorCheck};
use crate::core::lexical_diff::{self, LexicalDiff, WordContainment};
use crate::core::match_type::MatchType;
use crate::core::similarity;
use crate::core::stop_words::StopWords;
use crate::error::{AuditError, Result};

/// Columns the pipeline reads from every row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    MatchType,
    Keyword,
    SearchTerm,
    Clicks,
    Impressions,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::MatchType,
        Column::Keyword,
        Column::SearchTerm,
        Column::Clicks,
        Column::Impressions,
    ];

    /// Header name of the column in the report
    pub fn name(self) -> &'static str {
        match self {
            Column::MatchType => "BidMatchType",
            Column::Keyword => "Keyword",
            Column::SearchTerm => "Search term",
            Column::Clicks => "Clicks",
            Column::Impressions => "Impressions",
        }
    }
}

/// Offsets of the required columns, resolved once from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    match_type: usize,
    keyword: usize,
    search_term: usize,
    clicks: usize,
    impressions: usize,
}

impl ColumnIndex {
    /// Locate every required column. The first column with a matching name
    /// wins when a header repeats a name.
    pub fn resolve(header: &[String]) -> Result<Self> {
        let find = |column: Column| {
            header
                .iter()
                .position(|name| name == column.name())
                .ok_or_else(|| AuditError::MissingColumn {
                    column: column.name().to_string(),
                })
        };

        Ok(Self {
            match_type: find(Column::MatchType)?,
            keyword: find(Column::Keyword)?,
            search_term: find(Column::SearchTerm)?,
            clicks: find(Column::Clicks)?,
            impressions: find(Column::Impressions)?,
        })
    }

    pub fn offset(&self, column: Column) -> usize {
        match column {
            Column::MatchType => self.match_type,
            Column::Keyword => self.keyword,
            Column::SearchTerm => self.search_term,
            Column::Clicks => self.clicks,
            Column::Impressions => self.impressions,
        }
    }

    pub fn cell<'r>(&self, row: &'r [String], column: Column, line: u64) -> Result<&'r str> {
        row.get(self.offset(column))
            .map(String::as_str)
            .ok_or_else(|| AuditError::MissingCell {
                line,
                column: column.name().to_string(),
            })
    }

    fn number(&self, row: &[String], column: Column, line: u64) -> Result<f64> {
        let raw = self.cell(row, column, line)?;
        raw.trim()
            .parse::<f64>()
            .map(round4)
            .map_err(|_| AuditError::InvalidNumber {
                line,
                column: column.name().to_string(),
                value: raw.to_string(),
            })
    }
}

/// Round to 4 decimal places
fn round4(value: f64) -> f64 {
    // Large values have no fractional precision left to round
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    (value * 10_000.0).round() / 10_000.0
}

/// The cells of one row the audit works on, already case folded
#[derive(Debug, Clone, PartialEq)]
pub struct RowInput {
    pub match_type: MatchType,
    /// Lowercased keyword with its match type decoration still in place
    pub raw_keyword: String,
    /// Lowercased search term with commas removed
    pub search_term: String,
    pub clicks: f64,
    pub impressions: f64,
}

impl RowInput {
    pub fn new(match_type: &str, keyword: &str, search_term: &str, clicks: f64, impressions: f64) -> Self {
        Self {
            match_type: MatchType::from_cell(match_type),
            raw_keyword: keyword.to_lowercase(),
            search_term: search_term.to_lowercase().replace(',', ""),
            clicks,
            impressions,
        }
    }

    pub fn from_row(columns: &ColumnIndex, row: &[String], line: u64) -> Result<Self> {
        let match_type = columns.cell(row, Column::MatchType, line)?;
        let keyword = columns.cell(row, Column::Keyword, line)?;
        let search_term = columns.cell(row, Column::SearchTerm, line)?;
        let clicks = columns.number(row, Column::Clicks, line)?;
        let impressions = columns.number(row, Column::Impressions, line)?;
        Ok(Self::new(match_type, keyword, search_term, clicks, impressions))
    }

    pub fn normalized_keyword(&self) -> String {
        self.match_type.normalize(&self.raw_keyword)
    }
}

/// Diagnostics computed for one row
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub ratio: f64,
    pub clicks_weighted: f64,
    pub impressions_weighted: f64,
    pub diff: LexicalDiff,
    pub acronym_in_search_term: bool,
    pub phrase_missing: Option<bool>,
    pub anchors: AnchorCheck,
}

impl AnalysisResult {
    /// Render the diagnostic cells in output column order.
    pub fn to_cells(&self) -> Vec<String> {
        let (anchor_count, anchor_list) = match &self.anchors {
            AnchorCheck::NotBroadMatch => ("Not BMM".to_string(), "Not BMM".to_string()),
            AnchorCheck::NoneDropped => ("0".to_string(), "No dropped anchors".to_string()),
            AnchorCheck::Dropped(anchors) => (anchors.len().to_string(), anchors.join(" ")),
        };
        let phrase_missing = match self.phrase_missing {
            Some(missing) => format_bool(missing),
            None => "Not Phrase Match".to_string(),
        };
        let stop_words: Vec<&str> = self.diff.dropped_stop_words.iter().map(String::as_str).collect();

        vec![
            format_float(self.ratio),
            format_float(self.clicks_weighted),
            format_float(self.impressions_weighted),
            self.diff.word_count_diff.to_string(),
            self.diff.dropped_words.join(" "),
            self.diff.dropped_stop_words.len().to_string(),
            stop_words.join(" "),
            format_bool(self.acronym_in_search_term),
            phrase_missing,
            anchor_count,
            anchor_list,
        ]
    }
}

/// What happened to one data row
#[derive(Debug)]
pub enum RowOutcome {
    /// Blank or separator line with fewer than two cells
    Blank,
    /// Similarity above the ceiling
    Filtered { ratio: f64 },
    /// Bad data, skipped because the config allows it
    Malformed(AuditError),
    Audited(Vec<String>),
}

/// Per report audit pipeline
#[derive(Debug, Clone)]
pub struct AuditPipeline {
    columns: ColumnIndex,
    ceiling: f64,
    stop_words: StopWords,
    containment: WordContainment,
    skip_malformed_rows: bool,
    output_header: Vec<String>,
}

impl AuditPipeline {
    /// Build the pipeline for a report. Fails if the header lacks a required
    /// column.
    pub fn new(config: &AuditConfig, header: &[String]) -> Result<Self> {
        let columns = ColumnIndex::resolve(header)?;

        let mut output_header = header.to_vec();
        output_header.extend(config.new_columns.iter().cloned());

        Ok(Self {
            columns,
            ceiling: config.similarity_ceiling,
            stop_words: config.stop_word_set(),
            containment: config.word_containment,
            skip_malformed_rows: config.skip_malformed_rows,
            output_header,
        })
    }

    /// Report header followed by the diagnostic column names
    pub fn output_header(&self) -> &[String] {
        &self.output_header
    }

    /// Compute every diagnostic for a row, regardless of the ceiling.
    pub fn analyze(&self, input: &RowInput) -> AnalysisResult {
        let ratio = similarity::ratio(&input.raw_keyword, &input.search_term);
        self.analyze_with_ratio(input, ratio)
    }

    fn analyze_with_ratio(&self, input: &RowInput, ratio: f64) -> AnalysisResult {
        let keyword = input.normalized_keyword();
        let search_term = input.search_term.as_str();

        AnalysisResult {
            ratio,
            clicks_weighted: similarity::weighted(input.clicks, ratio),
            impressions_weighted: similarity::weighted(input.impressions, ratio),
            diff: lexical_diff::analyze(&keyword, search_term, &self.stop_words, self.containment),
            acronym_in_search_term: anomaly::acronym_in_search_term(&keyword, search_term),
            phrase_missing: anomaly::phrase_missing(input.match_type, &input.raw_keyword, search_term),
            anchors: anomaly::dropped_anchors(input.match_type, &input.raw_keyword, search_term),
        }
    }

    /// Process one data row. `line` is the 1-based line in the source file.
    pub fn process_row(&self, row: &[String], line: u64) -> Result<RowOutcome> {
        if row.len() < 2 {
            return Ok(RowOutcome::Blank);
        }

        let input = match RowInput::from_row(&self.columns, row, line) {
            Ok(input) => input,
            Err(e) if self.skip_malformed_rows && e.is_malformed_row() => {
                warn!("Skipping malformed row: {}", e);
                return Ok(RowOutcome::Malformed(e));
            }
            Err(e) => return Err(e),
        };

        let ratio = similarity::ratio(&input.raw_keyword, &input.search_term);
        if ratio > self.ceiling {
            debug!("Line {}: ratio {:.4} above ceiling {}", line, ratio, self.ceiling);
            return Ok(RowOutcome::Filtered { ratio });
        }

        let result = self.analyze_with_ratio(&input, ratio);
        let mut cells = row.to_vec();
        cells.extend(result.to_cells());
        Ok(RowOutcome::Audited(cells))
    }
}

pub fn format_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

/// Shortest round trip form of a float, always with a fractional part or
/// an exponent (`0.5`, `100000.0`, `1e-05`, `1e+16`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}
