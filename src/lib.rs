//! # headerbatch
//!
//! Rewrites the leading header comment (usually a license) of every file in a
//! directory tree.
//!
//! For each file, `headerbatch` strips the first recognized old header, if
//! any, and prepends a new one. Files can be excluded by path, through
//! allow-lists and deny-lists of simple wildcard patterns, or by content,
//! through headers that mark a file to be left alone.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use headerbatch::batcher::{Batcher, BatcherConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let batcher = Batcher::new(BatcherConfig {
//!         remove: vec!["headers/old.txt".into()],
//!         deny_list: Some("deny.txt".into()),
//!         ..BatcherConfig::new("headers/new.txt")
//!     })?;
//!
//!     let patched = batcher.patch_tree(Path::new("src"))?;
//!     println!("Headers added: {patched}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`batcher`] - Per-file rules and directory traversal
//! * [`matcher`] - Path patterns (`exact`, `prefix*`, `*suffix`, `prefix*suffix`)
//! * [`headers`] - Header blobs compared as content prefixes
//! * [`patterns`] - Allow-lists and deny-lists
//! * [`fs`] - File system access behind a trait
//! * [`config`] - Configuration file and command-line merging
//! * [`report`] - Per-file outcomes and totals
//! * [`logging`] - Logging utilities for verbose output

pub mod batcher;
pub mod config;
pub mod error;
pub mod fs;
pub mod headers;
pub mod logging;
pub mod matcher;
pub mod patterns;
pub mod report;
