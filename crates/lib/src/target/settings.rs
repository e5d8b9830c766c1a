//! Mapping from [`TargetDescriptor`] to conan `-s key=value` settings.
//!
//! Each setting has its own provider. A provider returns `Ok(None)` when the
//! setting does not apply to the target (e.g. `compiler.runtime` for gcc) and
//! an error when the target has no known conan equivalent.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::{Compiler, Os, Platform, RuntimeLibrary, TargetDescriptor};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no conan mapping for setting '{setting}' on target {target}: {reason}")]
pub struct SettingsMappingError {
  pub setting: &'static str,
  pub target: String,
  pub reason: String,
}

impl SettingsMappingError {
  fn new(setting: &'static str, target: &TargetDescriptor, reason: impl Into<String>) -> Self {
    Self {
      setting,
      target: target.target_string(),
      reason: reason.into(),
    }
  }
}

/// A single conan setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Setting {
  pub key: &'static str,
  pub value: String,
}

impl Setting {
  fn new(key: &'static str, value: impl Into<String>) -> Self {
    Self {
      key,
      value: value.into(),
    }
  }
}

impl fmt::Display for Setting {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={}", self.key, self.value)
  }
}

/// Ordered settings for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TargetSettings(pub Vec<Setting>);

impl TargetSettings {
  /// Command line form: `-s key=value` for every setting.
  pub fn args(&self) -> Vec<String> {
    self
      .0
      .iter()
      .flat_map(|setting| ["-s".to_string(), setting.to_string()])
      .collect()
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.iter().find(|s| s.key == key).map(|s| s.value.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = &Setting> {
    self.0.iter()
  }
}

impl fmt::Display for TargetSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
    write!(f, "{}", parts.join(" "))
  }
}

type SettingProvider = fn(&TargetDescriptor) -> Result<Option<Setting>, SettingsMappingError>;

/// Translate a target into conan settings.
///
/// `pin_compiler_version` adds `compiler.version`. It is off by default since
/// conan's detected profile usually knows the installed version better.
pub fn settings_for(target: &TargetDescriptor, pin_compiler_version: bool) -> Result<TargetSettings, SettingsMappingError> {
  let mut providers: Vec<SettingProvider> = Vec::with_capacity(6);
  providers.push(arch);
  providers.push(build_type);
  providers.push(compiler);
  providers.push(compiler_runtime);
  if pin_compiler_version {
    providers.push(compiler_version);
  }
  providers.push(os);

  let mut settings = Vec::with_capacity(providers.len());
  for provider in providers {
    if let Some(setting) = provider(target)? {
      settings.push(setting);
    }
  }
  Ok(TargetSettings(settings))
}

pub fn arch(target: &TargetDescriptor) -> Result<Option<Setting>, SettingsMappingError> {
  const KEY: &str = "arch";
  let value = match target.platform {
    Platform::Win32 => "x86",
    Platform::Win64 | Platform::Linux64 => "x86_64",
    Platform::MacOsArm64 => "armv8",
  };
  Ok(Some(Setting::new(KEY, value)))
}

pub fn build_type(target: &TargetDescriptor) -> Result<Option<Setting>, SettingsMappingError> {
  const KEY: &str = "build_type";
  let value = if target.optimization.is_debug() { "Debug" } else { "Release" };
  Ok(Some(Setting::new(KEY, value)))
}

pub fn compiler(target: &TargetDescriptor) -> Result<Option<Setting>, SettingsMappingError> {
  const KEY: &str = "compiler";
  let value = match (target.compiler, target.os()) {
    (Compiler::Vs2019 | Compiler::Vs2022, Os::Windows) => "Visual Studio",
    (Compiler::Gcc, Os::Linux) => "gcc",
    (Compiler::Clang, Os::Linux) => "clang",
    (Compiler::AppleClang, Os::MacOs) => "apple-clang",
    (compiler, os) => {
      return Err(SettingsMappingError::new(
        KEY,
        target,
        format!("compiler {} is not supported on {}", compiler, os),
      ));
    }
  };
  Ok(Some(Setting::new(KEY, value)))
}

pub fn compiler_runtime(target: &TargetDescriptor) -> Result<Option<Setting>, SettingsMappingError> {
  const KEY: &str = "compiler.runtime";
  if !target.compiler.is_visual_studio() {
    return match target.runtime {
      Some(runtime) => Err(SettingsMappingError::new(
        KEY,
        target,
        format!("runtime library {} only applies to Visual Studio", runtime),
      )),
      None => Ok(None),
    };
  }

  let runtime = target
    .runtime
    .unwrap_or_else(|| RuntimeLibrary::default_for(target.optimization));
  Ok(Some(Setting::new(KEY, runtime.as_str())))
}

pub fn compiler_version(target: &TargetDescriptor) -> Result<Option<Setting>, SettingsMappingError> {
  const KEY: &str = "compiler.version";
  let value = match target.compiler {
    Compiler::Vs2019 => "16",
    Compiler::Vs2022 => "17",
    // Left to the conan profile, which detects the installed version.
    Compiler::Gcc | Compiler::Clang | Compiler::AppleClang => return Ok(None),
  };
  Ok(Some(Setting::new(KEY, value)))
}

pub fn os(target: &TargetDescriptor) -> Result<Option<Setting>, SettingsMappingError> {
  const KEY: &str = "os";
  let value = match target.os() {
    Os::Windows => "Windows",
    Os::Linux => "Linux",
    Os::MacOs => "Macos",
  };
  Ok(Some(Setting::new(KEY, value)))
}
