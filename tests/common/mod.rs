#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use headerbatch::fs::{EntryKind, FileSystem};

/// In-memory file system for exercising the batcher without touching disk.
///
/// Directories are implied by the files under them. Paths registered with
/// [`MemoryFs::fail_reads`] or [`MemoryFs::fail_writes`] return an error.
#[derive(Default)]
pub struct MemoryFs {
  files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
  dirs: RefCell<BTreeSet<PathBuf>>,
  failing_reads: BTreeSet<PathBuf>,
  failing_writes: BTreeSet<PathBuf>,
  writes: RefCell<usize>,
}

impl MemoryFs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a file and every directory above it.
  pub fn with_file(self, path: &str, content: &str) -> Self {
    let path = PathBuf::from(path);
    let mut dirs = self.dirs.borrow_mut();
    let mut parent = path.parent();
    while let Some(dir) = parent {
      if dir.as_os_str().is_empty() {
        break;
      }
      dirs.insert(dir.to_path_buf());
      parent = dir.parent();
    }
    drop(dirs);
    self.files.borrow_mut().insert(path, content.as_bytes().to_vec());
    self
  }

  pub fn with_dir(self, path: &str) -> Self {
    self.dirs.borrow_mut().insert(PathBuf::from(path));
    self
  }

  pub fn fail_reads(mut self, path: &str) -> Self {
    self.failing_reads.insert(PathBuf::from(path));
    self
  }

  pub fn fail_writes(mut self, path: &str) -> Self {
    self.failing_writes.insert(PathBuf::from(path));
    self
  }

  pub fn content(&self, path: &str) -> String {
    let files = self.files.borrow();
    let bytes = files.get(Path::new(path)).expect("file exists");
    String::from_utf8(bytes.clone()).expect("utf-8 content")
  }

  pub fn write_count(&self) -> usize {
    *self.writes.borrow()
  }

  fn children<'a>(dir: &Path, paths: impl Iterator<Item = &'a PathBuf>) -> Vec<PathBuf> {
    paths.filter(|p| p.parent() == Some(dir)).cloned().collect()
  }
}

impl FileSystem for MemoryFs {
  fn kind(&self, path: &Path) -> EntryKind {
    if self.files.borrow().contains_key(path) {
      EntryKind::File
    } else if self.dirs.borrow().contains(path) {
      EntryKind::Directory
    } else {
      EntryKind::Missing
    }
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    if self.failing_reads.contains(path) {
      return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read denied"));
    }
    self
      .files
      .borrow()
      .get(path)
      .cloned()
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    if self.failing_writes.contains(path) {
      return Err(io::Error::new(io::ErrorKind::PermissionDenied, "write denied"));
    }
    *self.writes.borrow_mut() += 1;
    self.files.borrow_mut().insert(path.to_path_buf(), content.to_vec());
    Ok(())
  }

  fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
    Ok(Self::children(dir, self.files.borrow().keys()))
  }

  fn list_subdirs(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
    Ok(Self::children(dir, self.dirs.borrow().iter()))
  }
}
