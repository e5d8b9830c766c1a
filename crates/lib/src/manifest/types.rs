//! Manifest types for extdeps.
//!
//! # Fingerprints
//!
//! The serialized manifest text is the [`ResolutionKey`] under which resolved
//! dependency graphs are cached. Every section is stored in a [`BTreeSet`], and
//! entries are trimmed before emission, so two manifests holding the same entries
//! serialize byte-for-byte identically no matter how they were assembled.
//!
//! # Format
//!
//! ```text
//! [requires]
//! glew/2.2.0
//!
//! [options]
//! glew:shared=False
//!
//! [generators]
//! json
//! ```
//!
//! `tool_requires` is carried on the manifest but never written: the `json`
//! generator workflow only understands `requires`, `options` and `imports`, so
//! build tools come from the conan profile instead.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::{JSON_GENERATOR, KEY_DIGEST_LEN};

/// Declarative package requirements for one resolution request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
  /// Package references, e.g. `glew/2.2.0`.
  pub requires: BTreeSet<String>,
  /// Build-time tool packages, e.g. `cmake/3.27.0`. Not part of the conanfile.
  pub tool_requires: BTreeSet<String>,
  /// Package options, e.g. `glew:shared=False`.
  pub options: BTreeSet<String>,
  /// Import rules, e.g. `bin, *.dll -> ./bin`.
  pub imports: BTreeSet<String>,
}

impl Manifest {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_requires<I, S>(mut self, entries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.requires.extend(entries.into_iter().map(Into::into));
    self
  }

  pub fn with_tool_requires<I, S>(mut self, entries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.tool_requires.extend(entries.into_iter().map(Into::into));
    self
  }

  pub fn with_options<I, S>(mut self, entries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.options.extend(entries.into_iter().map(Into::into));
    self
  }

  pub fn with_imports<I, S>(mut self, entries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.imports.extend(entries.into_iter().map(Into::into));
    self
  }

  /// True when no written section holds a non-blank entry.
  pub fn is_empty(&self) -> bool {
    self.sections().iter().all(|(_, section)| normalized(section).is_empty())
  }

  fn sections(&self) -> [(&'static str, &BTreeSet<String>); 3] {
    [
      ("requires", &self.requires),
      ("options", &self.options),
      ("imports", &self.imports),
    ]
  }

  /// Render the manifest as `conanfile.txt` text.
  ///
  /// Sections appear in the order `requires`, `options`, `imports`,
  /// `generators`; empty ones are skipped. The generators section always
  /// names the `json` generator.
  pub fn serialize(&self) -> ResolutionKey {
    let mut text = String::new();

    for (header, entries) in self.sections() {
      let entries = normalized(entries);
      if entries.is_empty() {
        continue;
      }
      // Writing to a String cannot fail.
      let _ = writeln!(text, "[{}]", header);
      for entry in entries {
        let _ = writeln!(text, "{}", entry);
      }
      text.push('\n');
    }

    let _ = writeln!(text, "[generators]");
    let _ = writeln!(text, "{}", JSON_GENERATOR);

    ResolutionKey(text)
  }
}

fn normalized(entries: &BTreeSet<String>) -> BTreeSet<&str> {
  entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()).collect()
}

/// The serialized manifest text, used verbatim as the cache fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolutionKey(pub String);

impl ResolutionKey {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Truncated SHA-256 of the key text, for logs and reports.
  pub fn digest(&self) -> String {
    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());
    let full = format!("{:x}", hasher.finalize());
    full[..KEY_DIGEST_LEN].to_string()
  }
}

impl fmt::Display for ResolutionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.digest())
  }
}
