//! Directory layout for generated conan files.
//!
//! ```text
//! <generated root>/conan/<target string>/<project>/conanfile.txt
//! <generated root>/conan/<target string>/<project>/conanbuildinfo.json
//! ```

use std::path::{Path, PathBuf};

use crate::consts::{APP_NAME, BUILD_INFO_NAME, CONANFILE_NAME};
use crate::target::TargetDescriptor;

/// Returns the user's home directory, if one is configured
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory, if one is configured
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the directory for cache files for the application
#[cfg(windows)]
pub fn cache_dir() -> PathBuf {
  std::env::var_os("LOCALAPPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(std::env::temp_dir)
    .join(APP_NAME)
    .join("Cache")
}

/// Returns the directory for cache files for the application
#[cfg(not(windows))]
pub fn cache_dir() -> PathBuf {
  let cache_home = std::env::var_os("XDG_CACHE_HOME")
    .map(PathBuf::from)
    .or_else(|| home_dir().map(|home| home.join(".cache")))
    .unwrap_or_else(std::env::temp_dir);
  cache_home.join(APP_NAME)
}

/// Default root for generated files when none is configured.
pub fn default_generated_root() -> PathBuf {
  cache_dir().join("generated")
}

/// Resolves per-(target, project) working directories under a generated root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  root: PathBuf,
}

impl Layout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    // Avoid `\\?\` verbatim prefixes leaking into generated include paths on Windows.
    let root = dunce::canonicalize(&root).unwrap_or(root);
    Self { root }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Working directory conan runs in for one (target, project) pair.
  pub fn working_dir(&self, target: &TargetDescriptor, project: &str) -> PathBuf {
    self.root.join("conan").join(target.target_string()).join(project)
  }
}

pub fn conanfile_path(working_dir: &Path) -> PathBuf {
  working_dir.join(CONANFILE_NAME)
}

pub fn build_info_path(working_dir: &Path) -> PathBuf {
  working_dir.join(BUILD_INFO_NAME)
}
