//! # Configuration Module
//!
//! Run configuration for headerbatch: which header to insert, which headers
//! to remove or respect, and the allow/deny lists.
//!
//! Configuration can be specified in a `.headerbatch.toml` file, via the
//! `HEADERBATCH_CONFIG` environment variable, or entirely on the command
//! line. Command-line values take precedence.
//!
//! ```toml
//! header = "headers/new.txt"
//! remove = ["headers/old-2019.txt", "headers/old-2021.txt"]
//! ignore = ["headers/third-party.txt"]
//! deny-list = "deny.txt"
//! allow-list = "allow.txt"
//! on-error = "skip"
//! ```
//!
//! Relative paths in the file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::batcher::{BatcherConfig, ErrorPolicy};
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".headerbatch.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "HEADERBATCH_CONFIG";

/// Contents of a configuration file. Every field is optional so the command
/// line can fill in the rest.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Header to insert at the top of every patched file.
  #[serde(default)]
  pub header: Option<PathBuf>,

  /// Old headers to strip, tried in order.
  #[serde(default)]
  pub remove: Vec<PathBuf>,

  /// Headers marking files that must be left untouched.
  #[serde(default)]
  pub ignore: Vec<PathBuf>,

  #[serde(default)]
  pub deny_list: Option<PathBuf>,

  #[serde(default)]
  pub allow_list: Option<PathBuf>,

  #[serde(default)]
  pub on_error: Option<ErrorPolicy>,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
  pub header: Option<PathBuf>,
  pub remove: Vec<PathBuf>,
  pub ignore: Vec<PathBuf>,
  pub deny_list: Option<PathBuf>,
  pub allow_list: Option<PathBuf>,
  pub on_error: Option<ErrorPolicy>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// No header to insert was given anywhere.
  #[error("No header to insert: pass --header or set `header` in .headerbatch.toml")]
  MissingHeader,
}

impl Config {
  /// Load configuration from a file, resolving relative paths against the
  /// file's directory.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_paths(base))
  }

  /// Makes every relative path in the config relative to `base`.
  fn resolve_paths(self, base: &Path) -> Self {
    let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };

    Self {
      header: self.header.map(resolve),
      remove: self.remove.into_iter().map(resolve).collect(),
      ignore: self.ignore.into_iter().map(resolve).collect(),
      deny_list: self.deny_list.map(resolve),
      allow_list: self.allow_list.map(resolve),
      on_error: self.on_error,
    }
  }

  /// Applies command-line values on top of this config.
  ///
  /// Single values replace the config's; a repeatable list replaces the
  /// config's list only when at least one value was given.
  pub fn merge_cli_overrides(&mut self, overrides: CliOverrides) {
    if overrides.header.is_some() {
      self.header = overrides.header;
    }
    if !overrides.remove.is_empty() {
      self.remove = overrides.remove;
    }
    if !overrides.ignore.is_empty() {
      self.ignore = overrides.ignore;
    }
    if overrides.deny_list.is_some() {
      self.deny_list = overrides.deny_list;
    }
    if overrides.allow_list.is_some() {
      self.allow_list = overrides.allow_list;
    }
    if overrides.on_error.is_some() {
      self.on_error = overrides.on_error;
    }
  }

  /// Turns this config into a [`BatcherConfig`].
  pub fn into_batcher_config(self) -> Result<BatcherConfig, ConfigError> {
    let header = self.header.ok_or(ConfigError::MissingHeader)?;
    Ok(BatcherConfig {
      remove: self.remove,
      ignore: self.ignore,
      deny_list: self.deny_list,
      allow_list: self.allow_list,
      on_error: self.on_error.unwrap_or_default(),
      ..BatcherConfig::new(header)
    })
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `HEADERBATCH_CONFIG` environment variable
/// 3. `.headerbatch.toml` in `search_dir`
pub fn discover_config_path(explicit_path: Option<&Path>, search_dir: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = search_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `None` when `no_config` is set or no file is found. An explicit
/// `--config` path that does not exist is an error.
pub fn load_config(explicit_path: Option<&Path>, search_dir: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  if let Some(path) = explicit_path
    && !path.exists()
  {
    anyhow::bail!("Config file not found: {}", path.display());
  }

  match discover_config_path(explicit_path, search_dir) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
