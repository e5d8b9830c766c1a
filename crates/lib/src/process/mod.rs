//! Running the external package manager.
//!
//! The [`Installer`] trait is the seam between the resolution cache and the
//! `conan` subprocess: [`ConanInstaller`] is the real implementation, tests
//! substitute their own.

mod conan;
mod types;

use std::path::{Path, PathBuf};

pub use conan::ConanInstaller;
pub use types::ExternalToolError;

use crate::error::ResolveError;
use crate::manifest::ResolutionKey;
use crate::target::TargetSettings;

/// Everything one install needs.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
  /// Directory the manifest is written to and the tool runs in.
  pub working_dir: &'a Path,
  /// Serialized manifest text.
  pub manifest: &'a ResolutionKey,
  pub settings: &'a TargetSettings,
}

pub trait Installer: Send + Sync {
  /// Install the manifest's packages and return the path of the build-info artifact.
  fn install(&self, request: &InstallRequest<'_>) -> Result<PathBuf, ResolveError>;
}
