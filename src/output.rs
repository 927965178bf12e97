//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is organised by page, not by check kind. Each page leads with its
//! positional index and expected heading, with the file path as context. Check
//! results follow as indented status lines, and failures carry one more
//! indented line saying what was found.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 001 Digital Art Gallery (index.html)
//!     ok    page heading
//!     FAIL  layout.css is the first stylesheet
//!           `link[rel="stylesheet"][0]` href="css/main.css" does not contain "layout.css"
//! 002 Space (pages/space.html)
//!     not loaded: File not found: site/pages/space.html
//!
//! 31 passed, 1 failed, 1 page not loaded
//! ```
//!
//! ## Sweep
//!
//! ```text
//! pages/nature.html
//!     script ../js/scripts.js: target does not exist
//!
//! Swept 5 pages: 42 links (38 local, 4 external), 1 broken
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::check::{CheckOutcome, SiteReport};
use crate::scaffold::ScaffoldSummary;
use crate::sweep::SweepReport;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Pluralize `word` for `n` by appending `s`.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Status line for one check, plus a detail line when it failed.
fn check_lines(outcome: &CheckOutcome) -> Vec<String> {
    match &outcome.failure {
        None => vec![format!("{}ok    {}", indent(1), outcome.name)],
        Some(failure) => vec![
            format!("{}FAIL  {}", indent(1), outcome.name),
            format!("{}      {}", indent(1), failure),
        ],
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format a site report: every page with every check, then a summary line.
pub fn format_site_report(report: &SiteReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            page.title,
            page.path
        ));
        if let Some(err) = &page.load_error {
            lines.push(format!("{}not loaded: {}", indent(1), err));
            continue;
        }
        for outcome in &page.checks {
            lines.extend(check_lines(outcome));
        }
    }

    lines.push(String::new());
    let mut summary = format!("{} passed, {} failed", report.passed(), report.failed());
    let unloaded = report.unloaded();
    if unloaded > 0 {
        summary.push_str(&format!(", {} not loaded", plural(unloaded, "page")));
    }
    lines.push(summary);
    lines
}

/// Print a site report to stdout.
pub fn print_site_report(report: &SiteReport) {
    for line in format_site_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Sweep
// ============================================================================

/// Format a sweep report: broken links grouped by page, then totals.
pub fn format_sweep_report(report: &SweepReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_page: Option<&str> = None;
    for broken in &report.broken {
        if current_page != Some(broken.page.as_str()) {
            lines.push(broken.page.clone());
            current_page = Some(broken.page.as_str());
        }
        lines.push(format!(
            "{}{} {}: {}",
            indent(1),
            broken.element,
            broken.href,
            broken.reason
        ));
    }
    for page in &report.unreadable {
        lines.push(page.page.clone());
        lines.push(format!("{}not read: {}", indent(1), page.reason));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    let mut summary = format!(
        "Swept {}: {} ({} local, {} external), {} broken",
        plural(report.pages, "page"),
        plural(report.total_links, "link"),
        report.local_links,
        report.external_links,
        report.broken.len()
    );
    if !report.unreadable.is_empty() {
        summary.push_str(&format!(
            ", {} unreadable",
            plural(report.unreadable.len(), "page")
        ));
    }
    lines.push(summary);
    lines
}

/// Print a sweep report to stdout.
pub fn print_sweep_report(report: &SweepReport) {
    for line in format_sweep_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Scaffold
// ============================================================================

/// Format the list of files written by the scaffold.
pub fn format_scaffold_output(summary: &ScaffoldSummary, output: &Path) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .files
        .iter()
        .enumerate()
        .map(|(i, file)| format!("{} {}", format_index(i + 1), file.display()))
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "Wrote {} to {}",
        plural(summary.files.len(), "file"),
        output.display()
    ));
    lines
}

/// Print scaffold output to stdout.
pub fn print_scaffold_output(summary: &ScaffoldSummary, output: &Path) {
    for line in format_scaffold_output(summary, output) {
        println!("{}", line);
    }
}
