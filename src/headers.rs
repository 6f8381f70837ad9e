//! # Headers Module
//!
//! Ordered sets of header blobs loaded from files. Blobs are raw bytes and are
//! compared as prefixes of a file's content; nothing is parsed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::BatchError;
use crate::fs::FileSystem;

/// An ordered sequence of header blobs.
///
/// Slots whose source did not exist at load time stay empty and are skipped
/// when matching, so the position of every loaded blob matches the position
/// of its source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
  entries: Vec<Option<Vec<u8>>>,
}

impl HeaderSet {
  /// Builds a set from blobs that are all present.
  pub fn from_blobs<I, B>(blobs: I) -> Self
  where
    I: IntoIterator<Item = B>,
    B: Into<Vec<u8>>,
  {
    Self {
      entries: blobs.into_iter().map(|blob| Some(blob.into())).collect(),
    }
  }

  /// Loads one blob per source path.
  ///
  /// A source that does not exist or cannot be read leaves its slot empty.
  pub fn load<F: FileSystem + ?Sized>(fs: &F, paths: &[PathBuf]) -> Self {
    let mut entries = vec![None; paths.len()];

    for (slot, path) in entries.iter_mut().zip(paths) {
      match fs.read_optional(path) {
        Ok(Some(blob)) => {
          debug!("Loaded header {} ({} bytes)", path.display(), blob.len());
          *slot = Some(blob);
        }
        Ok(None) => warn!("Header source {} does not exist, skipping it", path.display()),
        Err(e) => warn!("Failed to read header source {}, skipping it: {}", path.display(), e),
      }
    }

    Self { entries }
  }

  /// Number of slots, loaded or not.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Number of slots holding a blob.
  pub fn loaded(&self) -> usize {
    self.entries.iter().flatten().count()
  }

  /// Returns the first loaded blob that `content` starts with.
  pub fn find_prefix(&self, content: &[u8]) -> Option<&[u8]> {
    self
      .entries
      .iter()
      .flatten()
      .map(Vec::as_slice)
      .find(|blob| content.starts_with(blob))
  }

  /// Whether `content` starts with any loaded blob.
  pub fn matches_any(&self, content: &[u8]) -> bool {
    self.find_prefix(content).is_some()
  }

  /// Removes the first matching blob from the front of `content`.
  ///
  /// At most one blob is removed. Returns the remaining content and whether
  /// anything was stripped.
  pub fn strip<'a>(&self, content: &'a [u8]) -> (&'a [u8], bool) {
    match self.find_prefix(content) {
      Some(blob) => (&content[blob.len()..], true),
      None => (content, false),
    }
  }
}

/// Loads the header to insert. Unlike removal and ignore headers, it must
/// exist.
pub fn load_insert_header<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Vec<u8>, BatchError> {
  fs.read_optional(path)
    .map_err(|source| BatchError::Read {
      path: path.to_path_buf(),
      source,
    })?
    .ok_or_else(|| BatchError::MissingHeader(path.to_path_buf()))
}
