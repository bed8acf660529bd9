//! # CLI Module
//!
//! Command-line interface for the duplicate file cleaner.
//!
//! ## Usage
//! ```bash
//! # Report duplicates, touch nothing
//! file-dedup --path ~/Downloads
//!
//! # Delete duplicates, then rename what is left
//! file-dedup --path ~/Downloads --duplicates --rename
//!
//! # JSON output
//! file-dedup -p ~/Downloads --output json
//! ```
//!
//! ## Exit status
//! - `0` - the run completed, even if some files could not be processed
//! - `1` - any other fatal error
//! - `2` - the path is missing, empty, or not a directory

use clap::{Parser, ValueEnum};
use console::{style, Term};
use duplicate_file_cleaner::core::pipeline::{Pipeline, PipelineResult};
use duplicate_file_cleaner::error::{DuplicateFinderError, ScanError};
use duplicate_file_cleaner::events::{
    null_sender, Event, EventChannel, PipelineEvent, PipelinePhase, RenameEvent, ScanEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

/// Exit status for a rejected root path
const EXIT_INVALID_PATH: u8 = 2;

/// Duplicate File Cleaner - find identical files, drop the copies
#[derive(Parser, Debug)]
#[command(name = "file-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to analyze
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Rename surviving files to random numeric names
    #[arg(short, long)]
    rename: bool,

    /// Delete files whose content duplicates an earlier file
    #[arg(short = 'd', long = "duplicates")]
    delete_duplicates: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Maximum directory depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (duplicate paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    duplicate_file_cleaner::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let term = Term::stderr();

    match run_dedup(&term, cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            term.write_line(&format!("{} {}", style("[!]").red().bold(), e))
                .ok();
            if e.is_invalid_input() {
                ExitCode::from(EXIT_INVALID_PATH)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run_dedup(term: &Term, cli: Cli) -> Result<(), DuplicateFinderError> {
    let root = cli.path.ok_or(ScanError::EmptyPath)?;
    let pretty = matches!(cli.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Duplicate File Cleaner").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .root(root)
        .rename(cli.rename)
        .delete_duplicates(cli.delete_duplicates)
        .max_depth(cli.max_depth)
        .build();

    let result = if pretty {
        run_with_progress(&pipeline)?
    } else {
        pipeline.run_with_events(&null_sender())?
    };

    match cli.output {
        OutputFormat::Pretty => print_pretty_summary(term, &result),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

/// Run the pipeline while a spinner thread renders its events.
fn run_with_progress(pipeline: &Pipeline) -> Result<PipelineResult, DuplicateFinderError> {
    let (sender, receiver) = EventChannel::new();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let spinner_clone = spinner.clone();

    let event_thread = thread::spawn(move || {
        let mut duplicates = 0usize;

        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => match phase {
                    PipelinePhase::Scanning => {
                        spinner_clone.set_message("Duplicates finding started...")
                    }
                    PipelinePhase::Renaming => spinner_clone.set_message("Renaming started..."),
                    _ => {}
                },
                Event::Scan(ScanEvent::DuplicateFound {
                    duplicate_path,
                    canonical_path,
                    deleted,
                }) => {
                    duplicates += 1;
                    spinner_clone.set_message(format!("{} duplicates so far", duplicates));
                    spinner_clone.println(format!(
                        "{} File [{}] is duplicate of\n\t[{}], {}",
                        style("[#]").cyan(),
                        display_path(&duplicate_path),
                        display_path(&canonical_path),
                        if deleted { "removed" } else { "ignored" }
                    ));
                }
                Event::Scan(ScanEvent::FileUnreadable { path, reason })
                | Event::Scan(ScanEvent::DeleteFailed { path, reason })
                | Event::Rename(RenameEvent::RenameFailed { path, reason }) => {
                    spinner_clone.println(format!(
                        "{} {}: {}",
                        style("[!]").red(),
                        display_path(&path),
                        reason
                    ));
                }
                Event::Scan(ScanEvent::Summary { duplicate_count }) => {
                    spinner_clone.println(format!(
                        "{} {} duplicates found!",
                        style("[#]").cyan(),
                        style(duplicate_count).cyan().bold()
                    ));
                }
                Event::Rename(RenameEvent::FileRenamed { old_path, new_path }) => {
                    spinner_clone.println(format!(
                        "{} File [{}] renamed to\n\t[{}]",
                        style("[#]").cyan(),
                        display_path(&old_path),
                        display_path(&new_path)
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Aborted { .. }) => {
                    spinner_clone.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    spinner.finish_and_clear();

    result
}

fn print_pretty_summary(term: &Term, result: &PipelineResult) {
    term.write_line("").ok();
    term.write_line(&format!("{} Run Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {:.1}s",
        style(result.files_scanned).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    term.write_line(&format!(
        "  {} duplicates found",
        style(result.duplicate_count).cyan()
    ))
    .ok();

    let deleted = result.deleted_count();
    if deleted > 0 {
        term.write_line(&format!(
            "  {} duplicates deleted ({} freed)",
            style(deleted).cyan(),
            style(format_bytes(result.reclaimed_bytes)).yellow()
        ))
        .ok();
    }

    if !result.renamed.is_empty() {
        term.write_line(&format!(
            "  {} files renamed",
            style(result.renamed.len()).cyan()
        ))
        .ok();
    }

    if !result.errors.is_empty() {
        term.write_line(&format!(
            "  {} files could not be processed",
            style(result.errors.len()).red()
        ))
        .ok();
    }

    if deleted == 0 && result.duplicate_count > 0 {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("No files were deleted. Re-run with --duplicates to remove the copies.").dim()
        ))
        .ok();
    }
}

fn print_json_results(result: &PipelineResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize results: {}", e),
    }
}

fn print_minimal_results(result: &PipelineResult) {
    for duplicate in &result.duplicates {
        println!("{}", duplicate.duplicate_path.display());
    }
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
