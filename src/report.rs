//! # Report Module
//!
//! Per-file outcomes of a batch run and the totals derived from them. The
//! report serializes to JSON for `--report-json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum FileOutcome {
  /// The new header was written. `stripped` is set when an old header was
  /// removed first.
  Patched { stripped: bool },
  /// The path is not an existing file.
  NotFound,
  /// An allow-list is configured and the path matches none of it.
  NotAllowed,
  /// The path matches the deny-list.
  Denied,
  /// The content starts with a header marking the file to be left alone.
  IgnoredHeader,
}

impl FileOutcome {
  pub const fn is_patched(self) -> bool {
    matches!(self, Self::Patched { .. })
  }

  /// Short human-readable reason for a skipped file.
  pub const fn reason(self) -> &'static str {
    match self {
      Self::Patched { stripped: true } => "replaced header",
      Self::Patched { stripped: false } => "added header",
      Self::NotFound => "not a file",
      Self::NotAllowed => "not in allow-list",
      Self::Denied => "matches deny-list",
      Self::IgnoredHeader => "starts with an ignored header",
    }
  }
}

/// Outcome of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  #[serde(flatten)]
  pub outcome: FileOutcome,
}

/// A file that failed and was skipped under the skip error policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  pub error: String,
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Totals and per-file entries for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
  /// Files that received the new header
  pub patched: usize,
  /// Patched files that had an old header removed first
  pub stripped: usize,
  pub not_allowed: usize,
  pub denied: usize,
  pub ignored_header: usize,
  /// Files or directories whose I/O failed and were skipped
  pub failed: usize,
  pub files: Vec<FileReport>,
  pub failures: Vec<FailureReport>,
}

impl BatchReport {
  pub fn record(&mut self, path: &Path, outcome: FileOutcome) {
    match outcome {
      FileOutcome::Patched { stripped } => {
        self.patched += 1;
        if stripped {
          self.stripped += 1;
        }
      }
      FileOutcome::NotAllowed => self.not_allowed += 1,
      FileOutcome::Denied => self.denied += 1,
      FileOutcome::IgnoredHeader => self.ignored_header += 1,
      FileOutcome::NotFound => {}
    }

    self.files.push(FileReport {
      path: path.to_path_buf(),
      outcome,
    });
  }

  pub fn record_failure(&mut self, path: &Path, error: impl std::fmt::Display) {
    self.failed += 1;
    self.failures.push(FailureReport {
      path: path.to_path_buf(),
      error: error.to_string(),
    });
  }

  /// Files that were looked at but deliberately left untouched.
  pub const fn skipped(&self) -> usize {
    self.not_allowed + self.denied + self.ignored_header
  }

  /// Iterates over the reports of patched files.
  pub fn patched_files(&self) -> impl Iterator<Item = &FileReport> {
    self.files.iter().filter(|file| file.outcome.is_patched())
  }

  /// Writes the report as pretty-printed JSON.
  pub fn write_json(&self, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")?;
    fs::write(output_path, json)
      .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_counts() {
    let mut report = BatchReport::default();
    report.record(Path::new("a.rs"), FileOutcome::Patched { stripped: true });
    report.record(Path::new("b.rs"), FileOutcome::Patched { stripped: false });
    report.record(Path::new("c.md"), FileOutcome::Denied);
    report.record(Path::new("d.rs"), FileOutcome::IgnoredHeader);
    report.record(Path::new("e.txt"), FileOutcome::NotAllowed);
    report.record_failure(Path::new("f.rs"), "permission denied");

    assert_eq!(report.patched, 2);
    assert_eq!(report.stripped, 1);
    assert_eq!(report.skipped(), 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.patched_files().count(), 2);
  }

  #[test]
  fn test_json_shape() {
    let mut report = BatchReport::default();
    report.record(Path::new("src/a.rs"), FileOutcome::Patched { stripped: false });
    report.record(Path::new("README.md"), FileOutcome::Denied);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["patched"], 1);
    assert_eq!(value["files"][0]["path"], "src/a.rs");
    assert_eq!(value["files"][0]["outcome"], "patched");
    assert_eq!(value["files"][0]["stripped"], false);
    assert_eq!(value["files"][1]["outcome"], "denied");
  }

  #[test]
  fn test_write_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("report.json");

    let mut report = BatchReport::default();
    report.record(Path::new("x.rs"), FileOutcome::IgnoredHeader);
    report.write_json(&output).unwrap();

    let parsed: BatchReport = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(parsed, report);
  }
}
