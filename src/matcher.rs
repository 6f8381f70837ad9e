//! # Matcher Module
//!
//! Path patterns used by allow-lists and deny-lists. A pattern is a plain
//! string with at most one meaningful `*`:
//!
//! * `src/main.rs` matches only that exact path
//! * `src/*` matches every path starting with `src/`
//! * `*.md` matches every path ending with `.md`
//! * `src/*.rs` matches paths starting with `src/` and ending with `.rs`
//!
//! Comparisons are byte-exact; there is no case folding and no separator
//! handling here (callers normalize separators before matching).

use tracing::warn;

/// The compiled shape of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
  /// No wildcard: only exact equality matches.
  Exact,
  /// `prefix*`: matches paths starting with the prefix.
  Prefix(String),
  /// `*suffix`: matches paths ending with the suffix.
  Suffix(String),
  /// `prefix*suffix`: matches paths with both the prefix and the suffix.
  Affix { prefix: String, suffix: String },
  /// Contains `*` but fits none of the wildcard shapes (e.g. `src/*foo`).
  Inert,
}

/// A pattern compiled once from its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
  raw: String,
  kind: PatternKind,
}

impl Pattern {
  /// Compiles a pattern.
  ///
  /// Wildcard branches are tried in a fixed order and the first applicable
  /// one decides the shape: trailing `*`, then leading `*`, then an inner
  /// `*.`. Later branches are never consulted, so `src/*.rs*` is a plain
  /// prefix pattern and does not match `src/main.rs`. A `prefix*suffix`
  /// pattern with more than one `*` is malformed; a warning is logged and
  /// only the first two segments are kept.
  pub fn new(raw: impl Into<String>) -> Self {
    let raw = raw.into();
    let kind = Self::classify(&raw);
    Self { raw, kind }
  }

  fn classify(raw: &str) -> PatternKind {
    if !raw.contains('*') {
      return PatternKind::Exact;
    }

    if let Some(prefix) = raw.strip_suffix('*') {
      return PatternKind::Prefix(prefix.to_string());
    }

    if let Some(suffix) = raw.strip_prefix('*') {
      return PatternKind::Suffix(suffix.to_string());
    }

    if raw.contains("*.") {
      let mut segments = raw.split('*');
      let prefix = segments.next().unwrap_or_default();
      let suffix = segments.next().unwrap_or_default();
      if segments.next().is_some() {
        warn!(
          "'{}' has more than one wildcard; matching with prefix '{}' and suffix '{}' only",
          raw, prefix, suffix
        );
      }
      return PatternKind::Affix {
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
      };
    }

    PatternKind::Inert
  }

  /// The pattern text as it was written.
  pub fn as_str(&self) -> &str {
    &self.raw
  }

  pub const fn kind(&self) -> &PatternKind {
    &self.kind
  }

  /// Checks whether `path` matches this pattern.
  pub fn matches(&self, path: &str) -> bool {
    if self.raw == path {
      return true;
    }

    match &self.kind {
      PatternKind::Exact | PatternKind::Inert => false,
      PatternKind::Prefix(prefix) => path.starts_with(prefix.as_str()),
      PatternKind::Suffix(suffix) => path.ends_with(suffix.as_str()),
      PatternKind::Affix { prefix, suffix } => path.starts_with(prefix.as_str()) && path.ends_with(suffix.as_str()),
    }
  }
}

impl std::fmt::Display for Pattern {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.raw)
  }
}

/// Checks whether `path` matches `pattern` without keeping the compiled form.
pub fn matches(pattern: &str, path: &str) -> bool {
  Pattern::new(pattern).matches(path)
}
