//! Build targets and their conan settings.
//!
//! A [`TargetDescriptor`] is what the project generator knows about a build
//! target. [`settings::settings_for`] translates it into the `-s key=value`
//! vocabulary conan understands, failing before any process is launched when a
//! combination has no known mapping.

pub mod kinds;
pub mod settings;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use kinds::{Compiler, Optimization, Os, ParseTargetError, Platform, RuntimeLibrary};
pub use settings::{Setting, SettingsMappingError, TargetSettings, settings_for};

/// One build target of one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetDescriptor {
  pub platform: Platform,
  pub optimization: Optimization,
  pub compiler: Compiler,
  /// Explicit C runtime selection. When unset the runtime follows the optimization level.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub runtime: Option<RuntimeLibrary>,
}

impl TargetDescriptor {
  pub fn new(platform: Platform, optimization: Optimization, compiler: Compiler) -> Self {
    Self {
      platform,
      optimization,
      compiler,
      runtime: None,
    }
  }

  pub fn with_runtime(mut self, runtime: RuntimeLibrary) -> Self {
    self.runtime = Some(runtime);
    self
  }

  /// Operating system implied by the platform.
  pub fn os(&self) -> Os {
    self.platform.os()
  }

  /// Runtime chosen explicitly and different from the optimization level's default.
  pub fn runtime_override(&self) -> Option<RuntimeLibrary> {
    self
      .runtime
      .filter(|runtime| *runtime != RuntimeLibrary::default_for(self.optimization))
  }

  /// Directory-safe identifier, e.g. `win64_vs2022_debug`.
  ///
  /// A non-default runtime is appended (`win64_vs2022_debug_md`), so targets that
  /// install different packages never share a working directory.
  pub fn target_string(&self) -> String {
    let base = format!("{}_{}_{}", self.platform, self.compiler, self.optimization);
    match self.runtime_override() {
      Some(runtime) => format!("{}_{}", base, runtime.as_str().to_ascii_lowercase()),
      None => base,
    }
  }
}

impl fmt::Display for TargetDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.target_string())
  }
}
