//! CLI output formatting.
//!
//! # Output Format
//!
//! Verbose runs start with the effective settings, then one line per file as
//! it finishes:
//!
//! ```text
//! Max size:  542px
//! Quality:   100
//! Rename:    no
//! Recursive: yes
//! Dry run:   no
//! --------------------------------------------------
//! resized      photos/IMG_2041.jpg (4032x3024) → (542x407)
//! skipped      photos/sticker.png (240x240)
//! renamed      photos/small.jpg → photos/00003.jpg (320x200)
//! unsupported  photos/notes.txt
//! failed       photos/broken.jpg: cannot decode photos/broken.jpg: ...
//! ```
//!
//! Every run ends with the tally:
//!
//! ```text
//! Done
//!     ✓ resized: 1
//!     ○ skipped: 1
//!     ✗ failed: 1
//! ```
//!
//! Dry runs prefix file lines with `[dry run]` and phrase the tally as
//! "would ...".
//!
//! # Architecture
//!
//! Each `format_*` function is pure and returns lines for testability; the
//! `print_*` wrappers write them to stdout.

use crate::config::{BatchOptions, SettingsConfig};
use crate::imaging::Dimensions;
use crate::process::{BatchReport, BatchSummary, FileOutcome, FileReport};
use std::path::Path;

const RULE_WIDTH: usize = 50;

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn dims(d: &Dimensions) -> String {
    format!("({}x{})", d.width, d.height)
}

/// Status column, padded so paths line up.
fn status(label: &str) -> String {
    format!("{:<12} ", label)
}

/// Format the effective settings banner shown in verbose mode.
pub fn format_settings(settings: &SettingsConfig, options: &BatchOptions) -> Vec<String> {
    let mut lines = vec![
        format!("Max size:  {}px", settings.max_size),
        format!("Quality:   {}", settings.quality),
        format!("Rename:    {}", yes_no(options.rename)),
        format!("Recursive: {}", yes_no(options.recursive)),
        format!("Dry run:   {}", yes_no(options.dry_run)),
    ];
    if let Some(out) = &options.output_dir {
        lines.push(format!("Output:    {}", out.display()));
    }
    lines.push("-".repeat(RULE_WIDTH));
    lines
}

/// Format one finished file as a single display line.
pub fn format_file_report(report: &FileReport, dry_run: bool) -> String {
    let source = report.source.display();
    let destination = report.destination.as_deref().unwrap_or(Path::new(""));
    let moved = destination != report.source.as_path();

    let line = match &report.outcome {
        FileOutcome::Resized { from, to } if moved => format!(
            "{}{} {} → {} {}",
            status("resized"),
            source,
            dims(from),
            destination.display(),
            dims(to)
        ),
        FileOutcome::Resized { from, to } => {
            format!("{}{} {} → {}", status("resized"), source, dims(from), dims(to))
        }
        FileOutcome::Skipped { dimensions } => {
            format!("{}{} {}", status("skipped"), source, dims(dimensions))
        }
        FileOutcome::Renamed { dimensions } => format!(
            "{}{} → {} {}",
            status("renamed"),
            source,
            destination.display(),
            dims(dimensions)
        ),
        FileOutcome::Copied { dimensions } => format!(
            "{}{} → {} {}",
            status("copied"),
            source,
            destination.display(),
            dims(dimensions)
        ),
        FileOutcome::Unsupported => format!("{}{}", status("unsupported"), source),
        FileOutcome::Failed { error, .. } => format!("{}{}: {}", status("failed"), source, error),
    };

    if dry_run {
        format!("[dry run] {}", line)
    } else {
        line
    }
}

/// Format the end-of-run tally.
///
/// Resized, skipped and failed are always shown; the other counters only
/// when non-zero.
pub fn format_summary(summary: &BatchSummary, dry_run: bool) -> Vec<String> {
    let verb = |done: &'static str, planned: &'static str| if dry_run { planned } else { done };

    let mut lines = vec![if dry_run {
        "Dry run complete, nothing was written".to_string()
    } else {
        "Done".to_string()
    }];
    lines.push(format!(
        "    ✓ {}: {}",
        verb("resized", "would resize"),
        summary.resized
    ));
    if summary.renamed > 0 {
        lines.push(format!(
            "    → {}: {}",
            verb("renamed", "would rename"),
            summary.renamed
        ));
    }
    if summary.copied > 0 {
        lines.push(format!(
            "    → {}: {}",
            verb("copied", "would copy"),
            summary.copied
        ));
    }
    lines.push(format!(
        "    ○ {}: {}",
        verb("skipped", "would skip"),
        summary.skipped
    ));
    if summary.unsupported > 0 {
        lines.push(format!("    - unsupported: {}", summary.unsupported));
    }
    lines.push(format!("    ✗ failed: {}", summary.failed));
    lines
}

/// Print the settings banner to stdout.
pub fn print_settings(settings: &SettingsConfig, options: &BatchOptions) {
    for line in format_settings(settings, options) {
        println!("{}", line);
    }
}

/// Print one file line to stdout.
pub fn print_file_report(report: &FileReport, dry_run: bool) {
    println!("{}", format_file_report(report, dry_run));
}

/// Print the tally to stdout, preceded by a blank line.
pub fn print_summary(report: &BatchReport) {
    println!();
    for line in format_summary(&report.summary, report.dry_run) {
        println!("{}", line);
    }
}
