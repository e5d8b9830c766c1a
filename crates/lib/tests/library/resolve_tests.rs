//! End-to-end resolution against a fake conan.
#![cfg(unix)]

use std::sync::Arc;
use std::thread;

use extdeps_lib::ResolveError;
use extdeps_lib::manifest::Manifest;
use extdeps_lib::merge::{BuildConfiguration, OutputKind};
use extdeps_lib::process::ExternalToolError;
use extdeps_lib::target::{Compiler, Optimization, Platform, TargetDescriptor};

use super::common::TestEnv;

fn win64_debug() -> TargetDescriptor {
  TargetDescriptor::new(Platform::Win64, Optimization::Debug, Compiler::Vs2022)
}

fn glew_manifest() -> Manifest {
  Manifest::new().with_requires(["glew/2.2.0"])
}

#[test]
fn hello_world_links_glew() {
  let env = TestEnv::new();
  let resolver = env.resolver(&env.succeeding_tool());
  let mut config = BuildConfiguration::new(OutputKind::Exe);

  resolver
    .add_external_dependencies(&mut config, &win64_debug(), "HelloWorld", &glew_manifest())
    .unwrap();

  assert_eq!(
    config.include_paths.as_slice(),
    ["/conan/data/glew/2.2.0/_/_/package/abc/include"]
  );
  assert_eq!(config.library_paths.as_slice(), ["/conan/data/glew/2.2.0/_/_/package/abc/lib"]);
  assert_eq!(config.library_files.as_slice(), ["glew32d"]);
  assert_eq!(config.defines.as_slice(), ["GLEW_STATIC"]);

  let work = env.root().join("conan").join("win64_vs2022_debug").join("HelloWorld");
  assert_eq!(
    std::fs::read_to_string(work.join("conanfile.txt")).unwrap(),
    "[requires]\nglew/2.2.0\n\n[generators]\njson\n"
  );
  assert!(work.join("conanbuildinfo.json").is_file());

  let log = std::fs::read_to_string(env.calls_path()).unwrap();
  assert!(log.contains("install ./conanfile.txt --build=missing"));
  assert!(log.contains("-s compiler=Visual Studio -s compiler.runtime=MTd -s os=Windows"));
}

#[test]
fn repeated_manifest_runs_conan_once() {
  let env = TestEnv::new();
  let resolver = env.resolver(&env.succeeding_tool());

  for project in ["Core", "Renderer", "Editor"] {
    let mut config = BuildConfiguration::new(OutputKind::Exe);
    resolver
      .add_external_dependencies(&mut config, &win64_debug(), project, &glew_manifest())
      .unwrap();
    assert_eq!(config.library_files.as_slice(), ["glew32d"]);
  }

  assert_eq!(env.calls(), 1);
  assert_eq!(resolver.cache().stats().hits, 2);
}

#[test]
fn release_is_installed_separately() {
  let env = TestEnv::new();
  let resolver = env.resolver(&env.succeeding_tool());
  let release = TargetDescriptor::new(Platform::Win64, Optimization::Release, Compiler::Vs2022);

  resolver.resolve(&glew_manifest(), &win64_debug(), "Core").unwrap();
  resolver.resolve(&glew_manifest(), &release, "Core").unwrap();

  assert_eq!(env.calls(), 2);
  assert_eq!(resolver.cache().len(), 2);
}

#[test]
fn failed_install_reports_stderr_and_is_retried() {
  let env = TestEnv::new();
  let resolver = env.resolver(&env.failing_tool());
  let manifest = Manifest::new().with_requires(["glew/9.9.9"]);

  for _ in 0..2 {
    let mut config = BuildConfiguration::new(OutputKind::Exe);
    let err = resolver
      .add_external_dependencies(&mut config, &win64_debug(), "Core", &manifest)
      .unwrap_err();
    match err {
      ResolveError::ExternalTool(ExternalToolError::Failed { code, stderr, .. }) => {
        assert_eq!(code, Some(1));
        assert!(stderr.contains("Unable to find glew/9.9.9"));
      }
      other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(config, BuildConfiguration::new(OutputKind::Exe));
  }

  assert_eq!(env.calls(), 2);
  assert!(resolver.cache().is_empty());
}

#[test]
fn concurrent_projects_share_one_install() {
  const PROJECTS: usize = 6;
  let env = TestEnv::new();
  let resolver = Arc::new(env.resolver(&env.succeeding_tool()));

  let handles: Vec<_> = (0..PROJECTS)
    .map(|i| {
      let resolver = Arc::clone(&resolver);
      thread::spawn(move || {
        let mut config = BuildConfiguration::new(OutputKind::Lib);
        resolver
          .add_external_dependencies(&mut config, &win64_debug(), &format!("Project{i}"), &glew_manifest())
          .unwrap();
        config
      })
    })
    .collect();

  for handle in handles {
    let config = handle.join().unwrap();
    assert_eq!(config.dependent_library_files.as_slice(), ["glew32d"]);
    assert_eq!(config.export_defines.as_slice(), ["GLEW_STATIC"]);
  }
  assert_eq!(env.calls(), 1);
}

#[test]
fn reference_by_alias_after_install() {
  let env = TestEnv::new();
  let resolver = env.resolver(&env.succeeding_tool());
  let mut core = BuildConfiguration::new(OutputKind::Lib);
  resolver
    .add_external_dependencies(&mut core, &win64_debug(), "Core", &glew_manifest())
    .unwrap();

  let mut app = BuildConfiguration::new(OutputKind::Exe);
  resolver
    .reference_external(&mut app, &win64_debug(), "Core", ["GLEW"])
    .unwrap();

  assert_eq!(app.library_files.as_slice(), ["glew32d"]);
  assert_eq!(app.defines.as_slice(), ["GLEW_STATIC"]);
  assert_eq!(env.calls(), 1);
}
