//! Merging resolved dependency facts into a [`BuildConfiguration`].
//!
//! Facts are collected into a [`StagedMerge`] first and committed in one step,
//! so a request that fails halfway (e.g. one identifier does not match) leaves
//! the caller's configuration untouched.

mod types;

pub use types::{BuildConfiguration, LinkPolicy, OutputKind, UniqueList};

use crate::build_info::DependencyRecord;

/// Pending additions to a [`BuildConfiguration`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedMerge {
  include_paths: UniqueList,
  library_paths: UniqueList,
  library_files: UniqueList,
  dependent_library_files: UniqueList,
  defines: UniqueList,
  export_defines: UniqueList,
}

impl StagedMerge {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stage a record's include paths, library paths, library files and defines.
  pub fn stage(&mut self, record: &DependencyRecord, policy: LinkPolicy) {
    self.include_paths.extend(&record.include_paths);
    self.library_paths.extend(&record.library_paths);
    match policy {
      LinkPolicy::Direct => self.library_files.extend(&record.library_files),
      LinkPolicy::Propagate => self.dependent_library_files.extend(&record.library_files),
    }
    self.defines.extend(&record.preprocessor_defines);
  }

  /// Stage a record's defines for export to dependents as well.
  pub fn stage_export_defines(&mut self, record: &DependencyRecord) {
    self.export_defines.extend(&record.preprocessor_defines);
  }

  pub fn is_empty(&self) -> bool {
    self.include_paths.is_empty()
      && self.library_paths.is_empty()
      && self.library_files.is_empty()
      && self.dependent_library_files.is_empty()
      && self.defines.is_empty()
      && self.export_defines.is_empty()
  }

  /// Apply every staged entry not already present in `config`.
  pub fn commit(self, config: &mut BuildConfiguration) {
    config.include_paths.extend(self.include_paths.as_slice());
    config.library_paths.extend(self.library_paths.as_slice());
    config.library_files.extend(self.library_files.as_slice());
    config.dependent_library_files.extend(self.dependent_library_files.as_slice());
    config.defines.extend(self.defines.as_slice());
    config.export_defines.extend(self.export_defines.as_slice());
  }
}

/// Merge one record into `config`. Applying the same record twice is a no-op the second time.
pub fn merge(config: &mut BuildConfiguration, record: &DependencyRecord, policy: LinkPolicy) {
  let mut staged = StagedMerge::new();
  staged.stage(record, policy);
  staged.commit(config);
}
