//! Engine configuration.
//!
//! Defaults can be overridden through environment variables:
//! - `EXTDEPS_CONAN`: conan program to launch
//! - `EXTDEPS_ROOT`: root directory for generated conan files
//! - `EXTDEPS_TIMEOUT_SECS`: upper bound on a single `conan install`

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::consts::{DEFAULT_BUILD_POLICY, DEFAULT_TOOL, ENV_ROOT, ENV_TIMEOUT_SECS, ENV_TOOL};
use crate::paths::default_generated_root;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("{var} must be a whole number of seconds, got '{value}'")]
  InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
  /// Program launched for installs.
  pub tool: PathBuf,

  /// Arguments placed before `install`, e.g. `["-m", "conans.conan"]` when `tool` is python.
  pub tool_args: Vec<String>,

  /// Root under which per-target, per-project working directories are created.
  pub generated_root: PathBuf,

  /// Maximum time a single install may run. `None` waits indefinitely.
  pub timeout: Option<Duration>,

  /// Value of `--build=` passed to conan.
  pub build_policy: String,

  /// Also pass `compiler.version`.
  pub pin_compiler_version: bool,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      tool: PathBuf::from(DEFAULT_TOOL),
      tool_args: Vec::new(),
      generated_root: default_generated_root(),
      timeout: None,
      build_policy: DEFAULT_BUILD_POLICY.to_string(),
      pin_compiler_version: false,
    }
  }
}

impl EngineConfig {
  /// Defaults overlaid with any `EXTDEPS_*` environment variables.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(tool) = std::env::var_os(ENV_TOOL).filter(|v| !v.is_empty()) {
      config.tool = PathBuf::from(tool);
    }

    if let Some(root) = std::env::var_os(ENV_ROOT).filter(|v| !v.is_empty()) {
      config.generated_root = PathBuf::from(root);
    }

    if let Ok(value) = std::env::var(ENV_TIMEOUT_SECS) {
      let secs = value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
        var: ENV_TIMEOUT_SECS,
        value: value.clone(),
      })?;
      config.timeout = Some(Duration::from_secs(secs));
    }

    Ok(config)
  }

  pub fn with_tool(mut self, tool: impl Into<PathBuf>) -> Self {
    self.tool = tool.into();
    self
  }

  pub fn with_tool_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.tool_args = args.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_generated_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.generated_root = root.into();
    self
  }

  pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }
}
