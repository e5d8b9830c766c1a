//! Shared helpers: a fake `conan` run through `/bin/sh`.

use std::path::{Path, PathBuf};

use extdeps_lib::Resolver;
use extdeps_lib::config::EngineConfig;
use tempfile::TempDir;

/// Build info the fake tool writes for every successful install.
pub const GLEW_BUILD_INFO: &str = r#"{
  "dependencies": [
    {
      "version": "2.2.0",
      "name": "glew",
      "rootpath": "/conan/data/glew/2.2.0/_/_/package/abc",
      "include_paths": ["/conan/data/glew/2.2.0/_/_/package/abc/include"],
      "lib_paths": ["/conan/data/glew/2.2.0/_/_/package/abc/lib"],
      "bin_paths": [],
      "libs": ["glew32d"],
      "system_libs": ["opengl32"],
      "defines": ["GLEW_STATIC"],
      "names": { "cmake_find_package": "GLEW", "cmake_find_package_multi": "GLEW" }
    }
  ],
  "settings": { "arch": "x86_64", "build_type": "Debug", "compiler": "Visual Studio", "os": "Windows" }
}"#;

/// Isolated generated root plus a fake conan that logs each invocation.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> PathBuf {
    self.temp.path().join("generated")
  }

  /// File the fake tool appends one line to per invocation.
  pub fn calls_path(&self) -> PathBuf {
    self.temp.path().join("calls.log")
  }

  pub fn calls(&self) -> usize {
    std::fs::read_to_string(self.calls_path())
      .map(|log| log.lines().count())
      .unwrap_or(0)
  }

  /// Writes `GLEW_BUILD_INFO` after a short delay.
  pub fn succeeding_tool(&self) -> PathBuf {
    let info = self.temp.path().join("buildinfo.json");
    std::fs::write(&info, GLEW_BUILD_INFO).unwrap();
    self.write_script(&format!(
      "echo \"$PWD $*\" >> '{}'\nsleep 0.2\ncp '{}' conanbuildinfo.json\n",
      self.calls_path().display(),
      info.display()
    ))
  }

  /// Fails with a package-not-found message.
  pub fn failing_tool(&self) -> PathBuf {
    self.write_script(&format!(
      "echo \"$PWD $*\" >> '{}'\necho 'ERROR: Unable to find glew/9.9.9' >&2\nexit 1\n",
      self.calls_path().display()
    ))
  }

  fn write_script(&self, body: &str) -> PathBuf {
    let path = self.temp.path().join("fake-conan.sh");
    std::fs::write(&path, body).unwrap();
    path
  }

  pub fn config(&self, script: &Path) -> EngineConfig {
    EngineConfig::default()
      .with_tool("/bin/sh")
      .with_tool_args([script.to_string_lossy().to_string()])
      .with_generated_root(self.root())
  }

  pub fn resolver(&self, script: &Path) -> Resolver {
    Resolver::new(self.config(script))
  }
}
