//! Integration tests for the search term auditor
//!
//! These tests run whole reports through the batch audit and check the files
//! it writes.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use search_term_auditor::app::{audit_reports, run_audit};
use search_term_auditor::core::lexical_diff::WordContainment;
use search_term_auditor::{analyze_pair, AuditConfig, AuditError};

const HEADER: &str = "SearchQuery,Keyword,Bid match type,BidMatchType,Search term,Clicks,Impressions";

fn report(rows: &[&str]) -> String {
    let mut text = String::from("Search Term Report\nAccount,Shoe Shop\n");
    text.push_str(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

fn workspace(reports: &[(&str, String)]) -> (tempfile::TempDir, AuditConfig) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("input");
    fs::create_dir(&input).expect("Failed to create input dir");
    for (name, contents) in reports {
        fs::write(input.join(name), contents).expect("Failed to write report");
    }

    let config = AuditConfig {
        input_directory: input,
        output_directory: dir.path().join("output"),
        ..AuditConfig::default()
    };
    (dir, config)
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .expect("Failed to open output");
    reader
        .records()
        .map(|record| record.expect("Bad output row").iter().map(str::to_string).collect())
        .collect()
}

fn output_files(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.expect("Bad dir entry").path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn test_audit_writes_augmented_report() {
    let rows = [
        "wfrs,[wide fit running shoes],Exact,Exact,wfrs,4,120",
        "shoes,\"running shoes\",Phrase,Phrase,best shoes sale,2,50",
        "sale,+running shoes,Broad,Broad,\"shoe, sale\",0,9",
        "Total,,,,,6,179",
    ];
    let (_dir, config) = workspace(&[("march.csv", report(&rows))]);

    let summaries = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.rows_read, 4);
    assert_eq!(summary.rows_written, 4);

    let output = read_rows(&summary.output);
    assert_eq!(output.len(), 5);
    assert_eq!(output[0].len(), 18);
    assert_eq!(output[0][7], "Diff Ratio");
    assert_eq!(output[0][17], "Dropped BMM Anchors");

    let exact = &output[1];
    assert_eq!(&exact[..7], &rows[0].split(',').collect::<Vec<_>>()[..]);
    assert_eq!(exact[14], "True");
    assert_eq!(exact[15], "Not Phrase Match");
    assert_eq!(exact[16], "Not BMM");

    let phrase = &output[2];
    assert_eq!(phrase[11], "running");
    assert_eq!(phrase[15], "True");

    let broad = &output[3];
    assert_eq!(broad[4], "shoe, sale");
    assert_eq!(broad[11], "running shoes");
    assert_eq!(broad[16], "1");
    assert_eq!(broad[17], "+running");
}

#[test]
fn test_ceiling_excludes_close_matches() {
    let rows = [
        "a,red shoe,Exact,Exact,red shoe bag,3,40",
        "b,hat,Exact,Exact,red hat for a kid,3,40",
    ];
    let (_dir, mut config) = workspace(&[("report.csv", report(&rows))]);
    config.similarity_ceiling = 0.5;

    let summaries = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(summaries[0].rows_filtered, 1);

    let output = read_rows(&summaries[0].output);
    assert_eq!(output.len(), 2);
    assert_eq!(output[1][1], "hat");
    assert_eq!(output[1][7], "0.3");
    assert!(output[1][7..].iter().take(4).all(|cell| !cell.is_empty()));
}

#[test]
fn test_zero_similarity_weights_use_floor() {
    let (_dir, config) = workspace(&[("r.csv", report(&["q,abc,Exact,Exact,xyz,10,0"]))]);
    let summaries = run_audit(&config, |_| {}).expect("Audit failed");
    let output = read_rows(&summaries[0].output);
    assert_eq!(output[1][7], "0.0");
    assert_eq!(output[1][8], "100000.0");
    assert_eq!(output[1][9], "0.0");
}

#[test]
fn test_output_name_embeds_source_and_timestamp() {
    let (_dir, config) = workspace(&[
        ("week one.csv", report(&["q,shoes,Exact,Exact,shoes,1,1"])),
        ("week two.csv", report(&["q,shoes,Exact,Exact,shoes,1,1"])),
    ]);

    let mut seen = Vec::new();
    let summaries = run_audit(&config, |summary| seen.push(summary.input.clone())).expect("Audit failed");
    assert_eq!(seen.len(), 2);

    let pattern = Regex::new(r"^week (one|two) Audited \d{18}( \(\d+\))?\.csv$").unwrap();
    for summary in &summaries {
        let name = summary.output.file_name().unwrap().to_string_lossy().to_string();
        assert!(pattern.is_match(&name), "unexpected output name {}", name);
        assert_eq!(summary.output.parent(), Some(config.output_directory.as_path()));
    }

    // A second run never overwrites the first
    let again = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(output_files(&config.output_directory).len(), 4);
    assert_ne!(again[0].output, summaries[0].output);
}

#[test]
fn test_row_longer_than_header_keeps_extra_cells() {
    let rows = ["q,shoes,Exact,Exact,running shoes,1,1,", "q,shoes,Exact,Exact,shoes,2,2"];
    let (_dir, config) = workspace(&[("wide.csv", report(&rows))]);

    let summaries = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(summaries[0].rows_written, 2);

    let output = read_rows(&summaries[0].output);
    assert_eq!(output[0].len(), 18);
    assert_eq!(output[1].len(), 19);
    assert_eq!(output[1][7], "");
    assert!(output[1][8].parse::<f64>().is_ok());
    assert_eq!(output[2].len(), 18);
}

#[test]
fn test_row_shorter_than_header_is_audited() {
    let text = format!(
        "{},Notes\nq,shoes,Exact,Exact,running shoes,1,1\nq,shoes,Exact,Exact,shoes,2,2,seen\n",
        HEADER
    );
    let (_dir, config) = workspace(&[("notes.csv", text)]);

    let summaries = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(summaries[0].rows_written, 2);

    let output = read_rows(&summaries[0].output);
    assert_eq!(output[0].len(), 19);
    assert_eq!(output[0][7], "Notes");
    assert_eq!(output[1].len(), 18);
    assert!(output[1][7].parse::<f64>().is_ok());
    assert_eq!(output[2].len(), 19);
    assert_eq!(output[2][7], "seen");
}

#[test]
fn test_audit_reports_uses_given_list() {
    let (_dir, config) = workspace(&[
        ("first.csv", report(&["q,shoes,Exact,Exact,shoes,1,1"])),
        ("second.csv", report(&["q,shoes,Exact,Exact,shoes,1,1"])),
    ]);

    let only = vec![config.input_directory.join("second.csv")];
    let summaries = audit_reports(&config, &only, |_| {}).expect("Audit failed");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].input, only[0]);
    assert_eq!(output_files(&config.output_directory).len(), 1);
}

#[test]
fn test_missing_column_aborts_before_output() {
    let text = "SearchQuery,Keyword,Bid match type,BidMatchType,Search term,Clicks\nq,a,Exact,Exact,a,1\n";
    let (_dir, config) = workspace(&[("bad.csv", text.to_string())]);

    let err = run_audit(&config, |_| {}).unwrap_err();
    assert!(matches!(err, AuditError::MissingColumn { ref column } if column == "Impressions"));
    assert!(output_files(&config.output_directory).is_empty());
}

#[test]
fn test_missing_header_aborts() {
    let (_dir, config) = workspace(&[("bad.csv", "just,some\nrandom,cells\n".to_string())]);
    let err = run_audit(&config, |_| {}).unwrap_err();
    assert!(matches!(err, AuditError::HeaderNotFound { .. }));
}

#[test]
fn test_bad_number_removes_partial_output() {
    let rows = ["q,shoes,Exact,Exact,shoes,1,1", "q,shoes,Exact,Exact,shoes,lots,1"];
    let (_dir, config) = workspace(&[("bad.csv", report(&rows))]);

    let err = run_audit(&config, |_| {}).unwrap_err();
    assert!(matches!(err, AuditError::InvalidNumber { line: 5, .. }));
    assert!(output_files(&config.output_directory).is_empty());
}

#[test]
fn test_bad_number_skipped_when_allowed() {
    let rows = ["q,shoes,Exact,Exact,shoes,1,1", "q,shoes,Exact,Exact,shoes,lots,1"];
    let (_dir, mut config) = workspace(&[("bad.csv", report(&rows))]);
    config.skip_malformed_rows = true;

    let summaries = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(summaries[0].rows_written, 1);
    assert_eq!(summaries[0].rows_malformed, 1);
}

#[test]
fn test_input_directory_errors() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = AuditConfig {
        input_directory: dir.path().join("missing"),
        output_directory: dir.path().join("output"),
        ..AuditConfig::default()
    };
    assert!(matches!(
        run_audit(&config, |_| {}),
        Err(AuditError::InputDirectoryNotFound(_))
    ));

    let (_dir, config) = workspace(&[]);
    assert!(matches!(run_audit(&config, |_| {}), Err(AuditError::NoReportsFound(_))));
}

#[test]
fn test_strict_token_containment() {
    let rows = ["q,run fast,Exact,Exact,running fast,1,1"];
    let (_dir, mut config) = workspace(&[("r.csv", report(&rows))]);

    let loose = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(read_rows(&loose[0].output)[1][11], "");

    config.word_containment = WordContainment::Token;
    let strict = run_audit(&config, |_| {}).expect("Audit failed");
    assert_eq!(read_rows(&strict[0].output)[1][11], "run");
}

#[test]
fn test_analyze_pair() {
    let result = analyze_pair("Exact", "[Red Running Shoes]", "running shoe sale").expect("Analysis failed");
    assert_eq!(result.diff.dropped_words, vec!["red", "shoes"]);
    assert_eq!(result.diff.word_count_diff, 0);
    assert!((0.0..=1.0).contains(&result.ratio));
}
