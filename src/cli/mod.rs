//! # CLI Module
//!
//! Command-line interface for the gallery pipeline.
//!
//! ## Usage
//! ```bash
//! # Hash ./raw_images into ./gallery
//! phash-gallery
//!
//! # Custom directories
//! phash-gallery --source ~/Downloads --gallery ~/Pictures/gallery
//!
//! # See what would happen
//! phash-gallery --dry-run
//!
//! # JSON summary
//! phash-gallery --output json
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use phash_gallery::core::pipeline::{
    FileOutcome, Pipeline, PipelineResult, DEFAULT_GALLERY_DIR, DEFAULT_SOURCE_DIR,
};
use phash_gallery::error::Result;
use phash_gallery::events::{self, Event, PipelineEvent, PlaceEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;

/// Rename images by perceptual hash and move them into a gallery
#[derive(Parser, Debug)]
#[command(name = "phash-gallery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to read images from
    #[arg(short, long, default_value = DEFAULT_SOURCE_DIR)]
    source: PathBuf,

    /// Directory to move renamed images into (created if missing)
    #[arg(short, long, default_value = DEFAULT_GALLERY_DIR)]
    gallery: PathBuf,

    /// Show what would be moved without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Include fingerprints in per-file lines
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One line per file plus a summary
    Pretty,
    /// JSON document for scripting
    Json,
    /// Gallery paths only
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let pipeline = Pipeline::builder()
        .source(cli.source.clone())
        .gallery(cli.gallery.clone())
        .dry_run(cli.dry_run)
        .build();

    let term = Term::stderr();
    let pretty = matches!(cli.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {} {} {}",
            style("phash-gallery").bold().cyan(),
            style(cli.source.display()).dim(),
            style("→").dim(),
            style(cli.gallery.display()).dim(),
        ))
        .ok();
        if cli.dry_run {
            term.write_line(&format!("{}", style("Dry run: no files will be moved").yellow()))
                .ok();
        }
    }

    let (sender, receiver) = events::channel();

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = cli.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Scan(ScanEvent::Completed { total_entries }) => {
                    pb.set_length(total_entries as u64);
                }
                Event::Place(PlaceEvent::Progress(p)) => {
                    pb.set_length(p.total as u64);
                    pb.set_position(p.completed as u64);
                    let line = describe_outcome(&p.outcome, verbose);
                    pb.suspend(|| println!("{}", line));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;

    match cli.output {
        OutputFormat::Pretty => print_pretty_summary(&term, &result, cli.dry_run),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One console line for an outcome
fn describe_outcome(outcome: &FileOutcome, verbose: bool) -> String {
    match outcome {
        FileOutcome::SkippedNonImage { path } => format!(
            "{} Skipping non-image file: {}",
            style("·").dim(),
            file_name(path)
        ),
        FileOutcome::SkippedDirectory { path } => format!(
            "{} Skipping directory: {}",
            style("·").dim(),
            file_name(path)
        ),
        FileOutcome::Moved {
            from,
            to,
            fingerprint,
        } => {
            let mut line = format!(
                "{} Moved: {} → {}",
                style("✓").green(),
                file_name(from),
                file_name(to)
            );
            if verbose {
                line.push_str(&format!(" {}", style(format!("[{}]", fingerprint)).dim()));
            }
            line
        }
        FileOutcome::Planned { from, to, .. } => format!(
            "{} Would move: {} → {}",
            style("→").cyan(),
            file_name(from),
            file_name(to)
        ),
        FileOutcome::SkippedDuplicate { path, existing, .. } => format!(
            "{} File already exists: {}, skipping {}.",
            style("=").yellow(),
            file_name(existing),
            file_name(path)
        ),
        FileOutcome::Failed { path, message } => format!(
            "{} Error processing {}: {}",
            style("✗").red(),
            file_name(path),
            message
        ),
    }
}

fn print_pretty_summary(term: &Term, result: &PipelineResult, dry_run: bool) {
    let summary = &result.summary;

    term.write_line("").ok();
    term.write_line(&format!(
        "{} {} entries in {:.1}s",
        style("✓").green().bold(),
        style(summary.total_entries).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();

    if dry_run {
        term.write_line(&format!("  {} would be moved", style(summary.planned).cyan()))
            .ok();
    } else {
        term.write_line(&format!("  {} moved", style(summary.moved).cyan()))
            .ok();
    }
    term.write_line(&format!(
        "  {} already in gallery",
        style(summary.duplicates).yellow()
    ))
    .ok();
    term.write_line(&format!(
        "  {} skipped (non-image or directory)",
        style(summary.non_images + summary.directories).dim()
    ))
    .ok();
    if summary.failed > 0 {
        term.write_line(&format!("  {} failed", style(summary.failed).red()))
            .ok();
    }
}

fn print_json_results(result: &PipelineResult) {
    let output = serde_json::json!({
        "summary": result.summary,
        "outcomes": result.outcomes,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

fn print_minimal_results(result: &PipelineResult) {
    for outcome in &result.outcomes {
        if let FileOutcome::Moved { to, .. } | FileOutcome::Planned { to, .. } = outcome {
            println!("{}", to.display());
        }
    }
}
