//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing.

mod patch;

use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
pub use patch::{PatchArgs, run_patch};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Prepend a header to every file under src/
  headerbatch --header LICENSE_HEADER.txt src/

  # Replace an old header with a new one
  headerbatch --header new.txt --remove old.txt src/

  # Try several old headers, leave generated files alone
  headerbatch -H new.txt -r old-2019.txt -r old-2021.txt -s generated.txt .

  # Restrict with path lists (one pattern per line: exact, dir/*, *.ext, dir/*.ext)
  headerbatch -H new.txt --allow-list allow.txt --deny-list deny.txt src/

  # Keep going when a file cannot be read or written
  headerbatch -H new.txt --on-error skip --report-json report.json .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub patch_args: PatchArgs,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
