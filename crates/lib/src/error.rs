//! Errors surfaced by dependency resolution.

use std::path::PathBuf;

use thiserror::Error;

use crate::build_info::MalformedBuildInfoError;
use crate::matcher::AmbiguousOrMissingDependencyError;
use crate::process::ExternalToolError;
use crate::target::SettingsMappingError;

/// Any failure of a resolution request. None of these are recoverable within the
/// request: each one means the build configuration would otherwise be wrong.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// Conan could not be launched, failed, timed out, or produced no build info.
  #[error(transparent)]
  ExternalTool(#[from] ExternalToolError),

  /// Conan produced build info this crate cannot decode.
  #[error(transparent)]
  MalformedBuildInfo(#[from] MalformedBuildInfoError),

  /// A requested package matched zero or several resolved packages.
  #[error(transparent)]
  AmbiguousOrMissingDependency(#[from] AmbiguousOrMissingDependencyError),

  /// The target has no conan settings equivalent.
  #[error(transparent)]
  SettingsMapping(#[from] SettingsMappingError),

  /// The working directory or manifest file could not be prepared.
  #[error("failed to prepare {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
