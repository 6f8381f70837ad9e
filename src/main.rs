//! # headerbatch
//!
//! Rewrites the leading header comment of every file in a directory tree.

mod cli;
mod output;

use std::process::ExitCode;

use crate::cli::{Cli, run_patch};
use crate::output::print_error;

fn main() -> ExitCode {
  let cli = Cli::parse_args();

  match run_patch(cli.patch_args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&e);
      ExitCode::FAILURE
    }
  }
}
