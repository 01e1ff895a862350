//! Search Term Auditor - command line entry point
//!
//! Parses arguments, sets up logging, builds the audit configuration and
//! audits every report in the input directory.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, LevelFilter};

use search_term_auditor::app;
use search_term_auditor::core::lexical_diff::WordContainment;
use search_term_auditor::utils::{file_utils, output_formatter};
use search_term_auditor::AuditConfig;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "search-term-audit",
    version,
    about = "Audits search term reports for keywords triggering on divergent search terms",
    long_about = "Reads every CSV search term report in the input directory and writes an audited copy with:
- Similarity ratio between keyword and search term (plus clicks/impressions weighted)
- Words and stop words the search term dropped
- Keyword acronyms, missing phrases and dropped broad match modifier anchors"
)]
struct Args {
    /// Similarity ceiling; rows above it are left out of the audited report
    #[arg(name = "ceiling")]
    ceiling: Option<f64>,

    /// Directory holding the search term reports
    #[arg(long = "input-dir")]
    input_dir: Option<PathBuf>,

    /// Directory for audited reports (created if missing)
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Path to JSON configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Treat a keyword word as present only if it is a whole search term word
    #[arg(long = "strict-tokens", action = ArgAction::SetTrue)]
    strict_tokens: bool,

    /// Skip rows with non-numeric metrics instead of stopping
    #[arg(long = "skip-malformed", action = ArgAction::SetTrue)]
    skip_malformed: bool,

    /// Export the run summary to a JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (default: search_term_audit.log)
    #[arg(long = "log-file", default_value = "search_term_audit.log")]
    log_file: String,
}

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        eprintln!("{}", "Please address the below error before rerunning:".red());
        eprintln!("\t{:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let config = build_config(args)?;
    let reports = file_utils::find_reports(&config.input_directory)?;

    let progress_bar = if !args.quiet {
        println!("\n{} {} search term reports...", "Auditing".bold(), reports.len());
        let pb = ProgressBar::new(reports.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} reports ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let summaries = app::audit_reports(&config, &reports, |summary| {
        if let Some(pb) = &progress_bar {
            pb.set_message(summary.input.display().to_string());
            pb.inc(1);
        }
    })?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Audit complete");
    }

    if let Some(json_path) = &args.json {
        output_formatter::export_summary_json(&summaries, json_path)?;
        info!("Exported run summary to {}", json_path.display());
    }

    if !args.quiet {
        println!("{}", output_formatter::format_summary(&summaries, start_time.elapsed()));
    }

    Ok(())
}

/// Set up logging with file output
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(file) = File::create(&args.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}

/// Defaults, then the config file, then command line overrides
fn build_config(args: &Args) -> Result<AuditConfig> {
    let mut config = AuditConfig::load(args.config.as_deref())?;

    if let Some(ceiling) = args.ceiling {
        config.similarity_ceiling = ceiling;
    }
    if let Some(dir) = &args.input_dir {
        config.input_directory = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_directory = dir.clone();
    }
    if args.strict_tokens {
        config.word_containment = WordContainment::Token;
    }
    if args.skip_malformed {
        config.skip_malformed_rows = true;
    }

    config.validate()?;
    info!(
        "Similarity ceiling {}, input {}, output {}",
        config.similarity_ceiling,
        config.input_directory.display(),
        config.output_directory.display()
    );

    Ok(config)
}
