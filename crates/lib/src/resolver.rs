//! Caller-facing resolution API.
//!
//! A [`Resolver`] is built once per generation run and shared (by reference or
//! `Arc`) with every thread that configures projects. It owns the
//! [`ResolutionCache`], so identical requests from different projects or
//! threads trigger a single `conan install`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::build_info::{self, DependencyGraph};
use crate::cache::{CacheKey, ResolutionCache};
use crate::config::EngineConfig;
use crate::error::ResolveError;
use crate::manifest::Manifest;
use crate::matcher::match_dependency;
use crate::merge::{BuildConfiguration, StagedMerge};
use crate::paths::{Layout, build_info_path};
use crate::process::{ConanInstaller, ExternalToolError, InstallRequest, Installer};
use crate::target::{TargetDescriptor, settings_for};

type PairKey = (TargetDescriptor, String);

pub struct Resolver {
  config: EngineConfig,
  layout: Layout,
  cache: ResolutionCache,
  installer: Box<dyn Installer>,
  /// Graph last used for each (target, project), so `reference_external` can skip the disk.
  resolved: Mutex<HashMap<PairKey, Arc<DependencyGraph>>>,
}

impl std::fmt::Debug for Resolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resolver")
      .field("config", &self.config)
      .field("layout", &self.layout)
      .field("cache", &self.cache)
      .finish_non_exhaustive()
  }
}

impl Resolver {
  /// Resolver that runs the real `conan` program described by `config`.
  pub fn new(config: EngineConfig) -> Self {
    let installer = ConanInstaller::new(&config);
    Self::with_installer(config, installer)
  }

  pub fn with_installer(config: EngineConfig, installer: impl Installer + 'static) -> Self {
    Self {
      layout: Layout::new(config.generated_root.clone()),
      config,
      cache: ResolutionCache::new(),
      installer: Box::new(installer),
      resolved: Mutex::new(HashMap::new()),
    }
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  pub fn cache(&self) -> &ResolutionCache {
    &self.cache
  }

  pub fn working_dir(&self, target: &TargetDescriptor, project: &str) -> PathBuf {
    self.layout.working_dir(target, project)
  }

  /// Resolve `manifest` for `target`, installing only if this exact request has
  /// not been resolved yet during this run.
  ///
  /// Settings are mapped before anything touches the disk, so an unsupported
  /// target fails without writing a manifest or launching conan.
  pub fn resolve(
    &self,
    manifest: &Manifest,
    target: &TargetDescriptor,
    project: &str,
  ) -> Result<Arc<DependencyGraph>, ResolveError> {
    let settings = settings_for(target, self.config.pin_compiler_version)?;
    let key = CacheKey {
      manifest: manifest.serialize(),
      settings,
    };
    let working_dir = self.working_dir(target, project);

    let graph = self.cache.get_or_load(&key, || {
      let artifact = self.installer.install(&InstallRequest {
        working_dir: &working_dir,
        manifest: &key.manifest,
        settings: &key.settings,
      })?;
      Ok(build_info::parse(&artifact)?)
    })?;

    self.remember(target, project, Arc::clone(&graph));
    Ok(graph)
  }

  /// Resolve `manifest` and merge every resolved package into `config`.
  ///
  /// Defines are also exported to dependents. `config` is only modified once the
  /// whole resolution has succeeded.
  pub fn add_external_dependencies(
    &self,
    config: &mut BuildConfiguration,
    target: &TargetDescriptor,
    project: &str,
    manifest: &Manifest,
  ) -> Result<(), ResolveError> {
    if manifest.is_empty() {
      // An unmappable target is an error even when there is nothing to install.
      settings_for(target, self.config.pin_compiler_version)?;
      debug!(project, target = %target, "manifest is empty, nothing to resolve");
      self.remember(target, project, Arc::new(DependencyGraph::default()));
      return Ok(());
    }

    let graph = self.resolve(manifest, target, project)?;

    let policy = config.link_policy();
    let mut staged = StagedMerge::new();
    for record in graph.iter() {
      staged.stage(record, policy);
      staged.stage_export_defines(record);
    }
    staged.commit(config);

    info!(project, target = %target, dependencies = graph.len(), "added external dependencies");
    Ok(())
  }

  /// Merge the named packages from the graph already resolved for (`target`, `project`).
  ///
  /// Every identifier must match exactly one package; if any does not, `config`
  /// is left untouched.
  pub fn reference_external<I, S>(
    &self,
    config: &mut BuildConfiguration,
    target: &TargetDescriptor,
    project: &str,
    identifiers: I,
  ) -> Result<(), ResolveError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let graph = self.resolved_graph(target, project)?;

    let policy = config.link_policy();
    let mut staged = StagedMerge::new();
    let mut count = 0;
    for identifier in identifiers {
      let record = match_dependency(&graph, identifier.as_ref())?;
      staged.stage(record, policy);
      count += 1;
    }
    staged.commit(config);

    info!(project, target = %target, references = count, "referenced external dependencies");
    Ok(())
  }

  /// The graph for (`target`, `project`): from memory if this run resolved it,
  /// otherwise from the build info a previous install left in the working directory.
  pub fn resolved_graph(&self, target: &TargetDescriptor, project: &str) -> Result<Arc<DependencyGraph>, ResolveError> {
    let pair = (*target, project.to_string());
    if let Some(graph) = self.index().get(&pair) {
      return Ok(Arc::clone(graph));
    }

    let path = build_info_path(&self.working_dir(target, project));
    if !path.is_file() {
      return Err(ExternalToolError::MissingArtifact { path }.into());
    }
    debug!(path = %path.display(), "loading previously installed build info");
    let graph = Arc::new(build_info::parse(&path)?);

    Ok(Arc::clone(self.index().entry(pair).or_insert(graph)))
  }

  fn remember(&self, target: &TargetDescriptor, project: &str, graph: Arc<DependencyGraph>) {
    self.index().insert((*target, project.to_string()), graph);
  }

  fn index(&self) -> std::sync::MutexGuard<'_, HashMap<PairKey, Arc<DependencyGraph>>> {
    self.resolved.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
