//! # Patch Command
//!
//! This module implements the header rewrite run: resolve the configuration,
//! build the batcher, walk the target and report the result.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use headerbatch::batcher::{Batcher, ErrorPolicy};
use headerbatch::config::{CliOverrides, Config, load_config};
use headerbatch::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use tracing::debug;

use crate::output::{
  print_blank_line, print_count, print_failures, print_patched_files, print_start_message, print_summary,
};

/// Arguments for the patch command
#[derive(Args, Debug, Default)]
pub struct PatchArgs {
  /// File or directory to patch. Directories are processed recursively.
  #[arg(value_name = "TARGET")]
  pub target: PathBuf,

  /// Header to insert at the top of every patched file
  #[arg(long, short = 'H', value_name = "FILE")]
  pub header: Option<PathBuf>,

  /// Old header to strip before inserting (repeatable, first match wins)
  #[arg(long, short = 'r', value_name = "FILE")]
  pub remove: Vec<PathBuf>,

  /// Leave files starting with this header untouched (repeatable)
  #[arg(long = "skip-header", short = 's', value_name = "FILE")]
  pub skip_header: Vec<PathBuf>,

  /// File with path patterns to exclude, one per line
  #[arg(long, short = 'd', value_name = "FILE")]
  pub deny_list: Option<PathBuf>,

  /// File with path patterns to include, one per line; other paths are skipped
  #[arg(long, short = 'a', value_name = "FILE")]
  pub allow_list: Option<PathBuf>,

  /// What to do when a file cannot be read or written
  #[arg(long, value_name = "POLICY", value_enum)]
  pub on_error: Option<ErrorPolicy>,

  /// Path to config file (default: .headerbatch.toml in the current directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Write a JSON report of every file's outcome to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors and the final count
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl PatchArgs {
  fn overrides(&self) -> CliOverrides {
    CliOverrides {
      header: self.header.clone(),
      remove: self.remove.clone(),
      ignore: self.skip_header.clone(),
      deny_list: self.deny_list.clone(),
      allow_list: self.allow_list.clone(),
      on_error: self.on_error,
    }
  }
}

/// Run the patch command with the given arguments
pub fn run_patch(args: PatchArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let mut config = load_config(args.config.as_deref(), &current_dir, args.no_config)?.unwrap_or_default();
  config.merge_cli_overrides(args.overrides());

  let batcher_config = Config::into_batcher_config(config)?;
  debug!("Header to insert: {}", batcher_config.header.display());

  let batcher = Batcher::new(batcher_config).context("Failed to load header rules")?;
  debug!("On I/O failure: {:?}", batcher.error_policy());

  print_start_message(&args.target);
  let start_time = Instant::now();

  let report = batcher
    .patch_tree_report(&args.target)
    .with_context(|| format!("Failed to patch {}", args.target.display()))?;

  debug!(
    "Visited {} files in {}ms",
    report.files.len(),
    start_time.elapsed().as_millis()
  );

  print_patched_files(&report, &args.target);
  print_failures(&report, &args.target);
  print_blank_line();
  print_summary(&report);

  if let Some(ref output_path) = args.report_json {
    report.write_json(output_path)?;
    headerbatch::info_log!("Generated JSON report at {}", output_path.display());
  }

  print_count(report.patched);

  Ok(())
}
