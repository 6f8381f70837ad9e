//! # Batcher Module
//!
//! Applies the header rules to files and directory trees.
//!
//! For each file the gates run in a fixed order:
//!
//! 1. allow-list: when configured, the path must match one of its patterns
//! 2. deny-list: when configured, the path must match none of its patterns
//! 3. ignore headers: the content must not start with any of them
//!
//! A file that passes every gate loses the first header-to-remove it starts
//! with (at most one), gets the header to insert prepended, and is written
//! back in full.
//!
//! Directories are walked depth-first, files before subdirectories at every
//! level.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::error::BatchError;
use crate::fs::{EntryKind, FileSystem, LocalFs};
use crate::headers::{HeaderSet, load_insert_header};
use crate::patterns::PatternList;
use crate::report::{BatchReport, FileOutcome};

/// What to do when reading, writing or listing fails during a tree walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
  /// Stop the whole run on the first failure.
  #[default]
  Abort,
  /// Log the failure, count the file as unpatched and keep going.
  Skip,
}

/// Sources for a [`Batcher`].
#[derive(Debug, Clone)]
pub struct BatcherConfig {
  /// Header prepended to every patched file. Must exist.
  pub header: PathBuf,
  /// Headers stripped before insertion, first match only.
  pub remove: Vec<PathBuf>,
  /// Headers marking files to leave untouched.
  pub ignore: Vec<PathBuf>,
  pub deny_list: Option<PathBuf>,
  pub allow_list: Option<PathBuf>,
  pub on_error: ErrorPolicy,
}

impl BatcherConfig {
  /// Creates a config with only the header to insert.
  ///
  /// Use struct update syntax to set the rest:
  /// ```ignore
  /// BatcherConfig {
  ///     remove: vec!["old.txt".into()],
  ///     ..BatcherConfig::new("new.txt")
  /// }
  /// ```
  pub fn new(header: impl Into<PathBuf>) -> Self {
    Self {
      header: header.into(),
      remove: Vec::new(),
      ignore: Vec::new(),
      deny_list: None,
      allow_list: None,
      on_error: ErrorPolicy::default(),
    }
  }
}

/// Loaded header rules and path lists.
#[derive(Debug, Clone, Default)]
pub struct Rules {
  pub insert: Vec<u8>,
  pub remove: HeaderSet,
  pub ignore: HeaderSet,
  pub deny_list: Option<PatternList>,
  pub allow_list: Option<PatternList>,
}

impl Rules {
  /// Loads every source named in `config`.
  ///
  /// Only the header to insert is required; the other sources are skipped
  /// when they do not exist or cannot be read.
  pub fn load<F: FileSystem + ?Sized>(fs: &F, config: &BatcherConfig) -> Result<Self, BatchError> {
    let insert = load_insert_header(fs, &config.header)?;
    let remove = HeaderSet::load(fs, &config.remove);
    let ignore = HeaderSet::load(fs, &config.ignore);
    let deny_list = config.deny_list.as_deref().and_then(|path| PatternList::load(fs, path));
    let allow_list = config.allow_list.as_deref().and_then(|path| PatternList::load(fs, path));

    Ok(Self {
      insert,
      remove,
      ignore,
      deny_list,
      allow_list,
    })
  }

  /// Runs the path gates (allow-list, then deny-list).
  pub fn check_path(&self, path: &str) -> Option<FileOutcome> {
    if let Some(allow) = &self.allow_list
      && !allow.matches_any(path)
    {
      return Some(FileOutcome::NotAllowed);
    }

    if let Some(pattern) = self.deny_list.as_ref().and_then(|deny| deny.first_match(path)) {
      trace!("{} matches deny pattern '{}'", path, pattern);
      return Some(FileOutcome::Denied);
    }

    None
  }

  /// Builds the patched content: strips at most one old header and prepends
  /// the new one. Returns the new content and whether a header was stripped.
  pub fn rewrite(&self, content: &[u8]) -> (Vec<u8>, bool) {
    let (body, stripped) = self.remove.strip(content);
    let mut patched = Vec::with_capacity(self.insert.len() + body.len());
    patched.extend_from_slice(&self.insert);
    patched.extend_from_slice(body);
    (patched, stripped)
  }
}

/// Normalizes a path into the string used for pattern matching: every
/// backslash becomes a forward slash.
pub fn match_key(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}

/// Rewrites file headers according to a set of [`Rules`].
pub struct Batcher<F: FileSystem = LocalFs> {
  rules: Rules,
  on_error: ErrorPolicy,
  fs: F,
}

impl Batcher<LocalFs> {
  /// Creates a batcher working on the local file system.
  ///
  /// # Errors
  ///
  /// Returns an error if the header to insert does not exist, or if an
  /// existing source cannot be read.
  pub fn new(config: BatcherConfig) -> Result<Self, BatchError> {
    Self::with_fs(config, LocalFs::new())
  }
}

impl<F: FileSystem> Batcher<F> {
  /// Creates a batcher on the given file system, loading all sources from it.
  pub fn with_fs(config: BatcherConfig, fs: F) -> Result<Self, BatchError> {
    let rules = Rules::load(&fs, &config)?;
    debug!(
      "Loaded rules: {}-byte header, {}/{} removal headers, {}/{} ignore headers, deny-list: {}, allow-list: {}",
      rules.insert.len(),
      rules.remove.loaded(),
      rules.remove.len(),
      rules.ignore.loaded(),
      rules.ignore.len(),
      rules.deny_list.as_ref().map_or(0, PatternList::len),
      rules.allow_list.as_ref().map_or(0, PatternList::len),
    );
    Ok(Self::from_rules(rules, config.on_error, fs))
  }

  /// Creates a batcher from already loaded rules.
  pub const fn from_rules(rules: Rules, on_error: ErrorPolicy, fs: F) -> Self {
    Self { rules, on_error, fs }
  }

  pub const fn rules(&self) -> &Rules {
    &self.rules
  }

  pub const fn error_policy(&self) -> ErrorPolicy {
    self.on_error
  }

  /// Patches a single file.
  ///
  /// Returns `Ok(true)` if the file was rewritten, `Ok(false)` if it does not
  /// exist or one of the gates rejected it.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or written.
  pub fn patch_file(&self, path: &Path) -> Result<bool, BatchError> {
    self.patch_file_outcome(path).map(FileOutcome::is_patched)
  }

  /// Patches a single file and reports why it was or was not rewritten.
  pub fn patch_file_outcome(&self, path: &Path) -> Result<FileOutcome, BatchError> {
    if self.fs.kind(path) != EntryKind::File {
      debug!("Skipping: {} (not a file)", path.display());
      return Ok(FileOutcome::NotFound);
    }

    let key = match_key(path);
    if let Some(outcome) = self.rules.check_path(&key) {
      debug!("Skipping: {} ({})", path.display(), outcome.reason());
      return Ok(outcome);
    }

    let content = self.fs.read(path).map_err(|source| BatchError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    if self.rules.ignore.matches_any(&content) {
      debug!("Skipping: {} ({})", path.display(), FileOutcome::IgnoredHeader.reason());
      return Ok(FileOutcome::IgnoredHeader);
    }

    let (patched, stripped) = self.rules.rewrite(&content);

    self.fs.write(path, &patched).map_err(|source| BatchError::Write {
      path: path.to_path_buf(),
      source,
    })?;

    let outcome = FileOutcome::Patched { stripped };
    debug!("Patched: {} ({})", path.display(), outcome.reason());
    Ok(outcome)
  }

  /// Patches every file under `root` and returns how many were rewritten.
  ///
  /// # Errors
  ///
  /// Returns [`BatchError::InvalidTarget`] if `root` is neither a file nor a
  /// directory. I/O failures abort the walk under [`ErrorPolicy::Abort`].
  pub fn patch_tree(&self, root: &Path) -> Result<usize, BatchError> {
    self.patch_tree_report(root).map(|report| report.patched)
  }

  /// Patches every file under `root` and returns the full report.
  pub fn patch_tree_report(&self, root: &Path) -> Result<BatchReport, BatchError> {
    let mut report = BatchReport::default();

    match self.fs.kind(root) {
      EntryKind::Missing => return Err(BatchError::InvalidTarget(root.to_path_buf())),
      EntryKind::File => self.visit_file(root, &mut report)?,
      EntryKind::Directory => self.visit_dir(root, &mut report)?,
    }

    Ok(report)
  }

  fn visit_dir(&self, dir: &Path, report: &mut BatchReport) -> Result<(), BatchError> {
    trace!("Entering {}", dir.display());

    let files = self.fs.list_files(dir).map_err(|source| BatchError::ListDir {
      path: dir.to_path_buf(),
      source,
    });
    match files {
      Ok(files) => {
        for file in &files {
          self.visit_file(file, report)?;
        }
      }
      Err(e) => return self.handle_failure(dir, e, report),
    }

    let subdirs = self.fs.list_subdirs(dir).map_err(|source| BatchError::ListDir {
      path: dir.to_path_buf(),
      source,
    });
    match subdirs {
      Ok(subdirs) => {
        for subdir in &subdirs {
          self.visit_dir(subdir, report)?;
        }
      }
      Err(e) => return self.handle_failure(dir, e, report),
    }

    Ok(())
  }

  fn visit_file(&self, path: &Path, report: &mut BatchReport) -> Result<(), BatchError> {
    match self.patch_file_outcome(path) {
      Ok(outcome) => {
        report.record(path, outcome);
        Ok(())
      }
      Err(e) => self.handle_failure(path, e, report),
    }
  }

  fn handle_failure(&self, path: &Path, error: BatchError, report: &mut BatchReport) -> Result<(), BatchError> {
    match self.on_error {
      ErrorPolicy::Abort => Err(error),
      ErrorPolicy::Skip => {
        warn!("Skipping {}: {}", path.display(), error);
        report.record_failure(path, &error);
        Ok(())
      }
    }
  }
}
