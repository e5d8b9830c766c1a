//! Build configuration types.

use serde::{Deserialize, Serialize};

/// An insertion-ordered list that never holds the same string twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UniqueList(Vec<String>);

impl UniqueList {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append `value` unless it is empty or already present. Returns whether it was added.
  pub fn push(&mut self, value: impl Into<String>) -> bool {
    let value = value.into();
    if value.is_empty() || self.contains(&value) {
      return false;
    }
    self.0.push(value);
    true
  }

  pub fn extend<I, S>(&mut self, values: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for value in values {
      self.push(value);
    }
  }

  pub fn contains(&self, value: &str) -> bool {
    self.0.iter().any(|existing| existing == value)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }
}

impl<S: Into<String>> FromIterator<S> for UniqueList {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut list = Self::new();
    list.extend(iter);
    list
  }
}

/// What the configured project produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
  #[default]
  Exe,
  Lib,
  Dll,
}

/// Where resolved library files are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPolicy {
  /// Link the libraries into this project's output.
  Direct,
  /// Hand the libraries on to whatever links this project.
  Propagate,
}

impl LinkPolicy {
  /// Static libraries do not link; their dependents must.
  pub fn for_output(output: OutputKind) -> Self {
    match output {
      OutputKind::Lib => Self::Propagate,
      OutputKind::Exe | OutputKind::Dll => Self::Direct,
    }
  }
}

/// The compiler/linker settings of one (project, target) configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
  pub output: OutputKind,
  pub include_paths: UniqueList,
  pub library_paths: UniqueList,
  /// Libraries linked into this project.
  pub library_files: UniqueList,
  /// Libraries propagated to dependents of this project.
  pub dependent_library_files: UniqueList,
  pub defines: UniqueList,
  /// Defines exported to dependents of this project.
  pub export_defines: UniqueList,
}

impl BuildConfiguration {
  pub fn new(output: OutputKind) -> Self {
    Self {
      output,
      ..Self::default()
    }
  }

  pub fn link_policy(&self) -> LinkPolicy {
    LinkPolicy::for_output(self.output)
  }
}
