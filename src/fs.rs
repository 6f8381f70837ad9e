//! # File System Module
//!
//! The file operations the batcher depends on, behind the [`FileSystem`]
//! trait so the patching rules can run against something other than the
//! local disk.
//!
//! [`LocalFs`] is the default implementation. Directory listings are one
//! level deep and sorted by file name so traversal order is deterministic,
//! and writes replace the target atomically through a temporary file in the
//! same directory. Symlinks met while listing are skipped; a symlink passed
//! directly is followed and its target is replaced.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::trace;
use walkdir::WalkDir;

/// What a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
  File,
  Directory,
  Missing,
}

/// File operations used to load configuration sources and patch files.
pub trait FileSystem {
  /// Reports whether `path` is a file, a directory, or neither.
  fn kind(&self, path: &Path) -> EntryKind;

  /// Reads the whole content of a file.
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  /// Replaces the whole content of a file.
  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  /// Lists the files directly inside `dir`.
  fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

  /// Lists the directories directly inside `dir`.
  fn list_subdirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

  /// Reads a file, or returns `None` when it does not exist.
  fn read_optional(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
    if self.kind(path) != EntryKind::File {
      return Ok(None);
    }
    self.read(path).map(Some)
  }

  /// Reads a file as lines, or returns `None` when it does not exist.
  ///
  /// Line endings (`\n` or `\r\n`) are removed. Invalid UTF-8 is replaced
  /// rather than rejected.
  fn read_lines(&self, path: &Path) -> io::Result<Option<Vec<String>>> {
    let Some(bytes) = self.read_optional(path)? else {
      return Ok(None);
    };
    let text = String::from_utf8_lossy(&bytes);
    Ok(Some(text.lines().map(str::to_string).collect()))
  }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
  fn kind(&self, path: &Path) -> EntryKind {
    (**self).kind(path)
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    (**self).read(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    (**self).write(path, content)
  }

  fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
    (**self).list_files(dir)
  }

  fn list_subdirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
    (**self).list_subdirs(dir)
  }
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl LocalFs {
  pub const fn new() -> Self {
    Self
  }

  fn list_children(dir: &Path, want_dirs: bool) -> io::Result<Vec<PathBuf>> {
    let mut children = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
      let entry = entry?;
      let file_type = entry.file_type();
      // Symlinks are neither and get skipped
      if (want_dirs && file_type.is_dir()) || (!want_dirs && file_type.is_file()) {
        children.push(entry.into_path());
      }
    }

    trace!(
      "Listed {} {} in {}",
      children.len(),
      if want_dirs { "directories" } else { "files" },
      dir.display()
    );

    Ok(children)
  }
}

impl FileSystem for LocalFs {
  fn kind(&self, path: &Path) -> EntryKind {
    match fs::metadata(path) {
      Ok(metadata) if metadata.is_file() => EntryKind::File,
      Ok(metadata) if metadata.is_dir() => EntryKind::Directory,
      _ => EntryKind::Missing,
    }
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    // Replace what a symlink points to, not the link
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(&target) {
      fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(&target).map_err(|e| e.error)?;
    Ok(())
  }

  fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
    Self::list_children(dir, false)
  }

  fn list_subdirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
    Self::list_children(dir, true)
  }
}
