//! # Pattern List Module
//!
//! Allow-lists and deny-lists: line-delimited files with one [`Pattern`] per
//! line.

use std::path::Path;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::matcher::Pattern;

/// An ordered list of path patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternList {
  patterns: Vec<Pattern>,
}

impl PatternList {
  /// Builds a list from lines of text. Blank lines are skipped; every other
  /// line is taken verbatim, including surrounding spaces.
  pub fn from_lines<I, S>(lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let patterns = lines
      .into_iter()
      .filter(|line| !line.as_ref().is_empty())
      .map(|line| Pattern::new(line.as_ref()))
      .collect();
    Self { patterns }
  }

  /// Loads a list from a file.
  ///
  /// Returns `None` when the file does not exist or cannot be read, which
  /// means the list is not configured at all.
  pub fn load<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Option<Self> {
    match fs.read_lines(path) {
      Ok(Some(lines)) => {
        let list = Self::from_lines(lines);
        debug!("Loaded {} patterns from {}", list.len(), path.display());
        Some(list)
      }
      Ok(None) => {
        warn!("Pattern list {} does not exist, skipping it", path.display());
        None
      }
      Err(e) => {
        warn!("Failed to read pattern list {}, skipping it: {}", path.display(), e);
        None
      }
    }
  }

  pub fn len(&self) -> usize {
    self.patterns.len()
  }

  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }

  /// Returns the first pattern matching `path`.
  pub fn first_match(&self, path: &str) -> Option<&Pattern> {
    self.patterns.iter().find(|pattern| pattern.matches(path))
  }

  pub fn matches_any(&self, path: &str) -> bool {
    self.first_match(path).is_some()
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;
  use crate::fs::LocalFs;

  #[test]
  fn test_from_lines_skips_blank_lines() {
    let list = PatternList::from_lines(["*.md", "", "vendor/*"]);
    assert_eq!(list.len(), 2);
    assert!(list.matches_any("docs/a.md"));
    assert!(list.matches_any("vendor/x.c"));
    assert!(!list.matches_any("src/main.rs"));
  }

  #[test]
  fn test_first_match_reports_pattern() {
    let list = PatternList::from_lines(["src/*", "*.rs"]);
    assert_eq!(list.first_match("src/main.rs").map(Pattern::as_str), Some("src/*"));
    assert_eq!(list.first_match("lib.rs").map(Pattern::as_str), Some("*.rs"));
  }

  #[test]
  fn test_empty_list_matches_nothing() {
    let list = PatternList::from_lines(Vec::<String>::new());
    assert!(list.is_empty());
    assert!(!list.matches_any(""));
  }

  #[test]
  fn test_load_missing_file_is_none() {
    let dir = tempdir().unwrap();
    let result = PatternList::load(&LocalFs::new(), &dir.path().join("allow.txt"));
    assert!(result.is_none());
  }

  #[test]
  fn test_load_crlf_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deny.txt");
    fs::write(&path, "*.md\r\n*.json\r\n").unwrap();

    let list = PatternList::load(&LocalFs::new(), &path).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.matches_any("package.json"));
  }
}
