//! # Output Module
//!
//! This module centralizes all user-facing output for headerbatch.
//!
//! - The final `Headers added: N` line always goes to stdout (even with `-q`),
//!   so scripts can read the count
//! - Per-category totals and skipped failures are shown by default
//! - Every patched file is listed with `-v`

use std::path::Path;

use headerbatch::logging::{is_quiet, is_verbose};
use headerbatch::report::BatchReport;
use owo_colors::{OwoColorize, Stream};

/// Symbols used in output
pub mod symbols {
  /// Header written
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// File failed
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header replaced
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the start message for a run.
pub fn print_start_message(target: &Path) {
  if is_quiet() {
    return;
  }

  println!("Patching headers under {}...", target.display());
}

/// Print every patched file. Only shown in verbose mode.
pub fn print_patched_files(report: &BatchReport, root: &Path) {
  if !is_verbose() {
    return;
  }

  for file in report.patched_files() {
    let display_path = make_relative_path(&file.path, root);
    let symbol = if matches!(file.outcome, headerbatch::report::FileOutcome::Patched { stripped: true }) {
      symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
    } else {
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
    };
    println!("  {} {} ({})", symbol, display_path, file.outcome.reason());
  }
}

/// Print the files that failed and were skipped.
pub fn print_failures(report: &BatchReport, root: &Path) {
  if report.failures.is_empty() {
    return;
  }

  let count = report.failures.len();
  eprintln!(
    "{} {} {} could not be patched:",
    symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
    count,
    if count == 1 { "path" } else { "paths" }
  );

  for failure in &report.failures {
    eprintln!("  {}: {}", make_relative_path(&failure.path, root), failure.error);
  }
}

/// Print the processing summary.
///
/// Format: "Summary: X patched (Y replaced), Z skipped, W failed"
pub fn print_summary(report: &BatchReport) {
  if is_quiet() {
    return;
  }

  let failed_str = if report.failed > 0 {
    report.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    report.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  println!(
    "Summary: {} patched ({} replaced), {} skipped, {} failed",
    report.patched.if_supports_color(Stream::Stdout, |s| s.cyan()),
    report.stripped.if_supports_color(Stream::Stdout, |s| s.cyan()),
    report.skipped().if_supports_color(Stream::Stdout, |s| s.dimmed()),
    failed_str
  );

  if is_verbose() {
    println!(
      "  not in allow-list: {}, denied: {}, ignored header: {}",
      report.not_allowed, report.denied, report.ignored_header
    );
  }
}

/// Print the final count. Shown even in quiet mode.
pub fn print_count(patched: usize) {
  println!("Headers added: {}", patched);
}

/// Print a top-level failure with its full cause chain.
pub fn print_error(error: &anyhow::Error) {
  eprintln!(
    "{} {:#}",
    "Error:".if_supports_color(Stream::Stderr, |s| s.red()),
    error
  );
  if is_verbose() {
    eprintln!("{:?}", error);
  }
}

/// Make a path relative to the run's root for display.
fn make_relative_path(path: &Path, root: &Path) -> String {
  path
    .strip_prefix(root)
    .ok()
    .filter(|p| !p.as_os_str().is_empty())
    .map(|p| p.to_string_lossy().to_string())
    .unwrap_or_else(|| path.to_string_lossy().to_string())
}
