//! # Error Module
//!
//! Errors surfaced by the batcher. Missing optional sources (removal headers,
//! ignore headers, pattern lists) are not errors; they only disable the
//! corresponding rule.

use std::io;
use std::path::PathBuf;

/// Error type for batch operations.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
  /// The traversal root is neither a file nor a directory.
  #[error("'{0}' is neither a file nor a directory")]
  InvalidTarget(PathBuf),

  /// The header to insert does not exist.
  #[error("Header to insert not found: {0}")]
  MissingHeader(PathBuf),

  /// A file could not be read.
  #[error("Failed to read '{path}': {source}")]
  Read { path: PathBuf, source: io::Error },

  /// A file could not be written.
  #[error("Failed to write '{path}': {source}")]
  Write { path: PathBuf, source: io::Error },

  /// A directory could not be listed.
  #[error("Failed to list directory '{path}': {source}")]
  ListDir { path: PathBuf, source: io::Error },
}

impl BatchError {
  /// Whether this error is a per-file or per-directory I/O failure, as
  /// opposed to a problem with the run itself.
  pub const fn is_io(&self) -> bool {
    matches!(self, Self::Read { .. } | Self::Write { .. } | Self::ListDir { .. })
  }
}
