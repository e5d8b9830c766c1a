//! Implementation of the `extdeps resolve` command.
//!
//! Every (project, target) pair of the request is resolved on tokio's blocking
//! pool through one shared [`Resolver`], so identical manifests install once.
//! References to other projects are applied after all installs finished.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use extdeps_lib::Resolver;
use extdeps_lib::cache::CacheStats;
use extdeps_lib::config::EngineConfig;
use extdeps_lib::merge::BuildConfiguration;
use extdeps_lib::target::TargetDescriptor;

use crate::output::{OutputFormat, print_configuration, print_json, print_resolve_summary};
use crate::request::{ProjectRequest, Request};

#[derive(Debug, Serialize)]
struct ResolvedConfiguration {
  project: String,
  target: TargetDescriptor,
  configuration: BuildConfiguration,
}

#[derive(Debug, Serialize)]
struct ResolveReport {
  configurations: Vec<ResolvedConfiguration>,
  cache: CacheStats,
}

pub fn cmd_resolve(path: &Path, config: EngineConfig, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let request = Request::load(path)?;
  let resolver = Arc::new(Resolver::new(config));

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let mut configurations = rt.block_on(resolve_all(&resolver, &request))?;
  apply_references(&resolver, &request, &mut configurations)?;

  let report = ResolveReport {
    configurations,
    cache: resolver.cache().stats(),
  };

  if output.is_json() {
    print_json(&report)?;
    return Ok(());
  }

  for resolved in &report.configurations {
    print_configuration(&resolved.project, &resolved.target, &resolved.configuration);
  }

  println!();
  print_resolve_summary(report.configurations.len(), &report.cache, start.elapsed());

  Ok(())
}

async fn resolve_all(resolver: &Arc<Resolver>, request: &Request) -> Result<Vec<ResolvedConfiguration>> {
  let mut pending = Vec::with_capacity(request.configuration_count());
  for project in &request.projects {
    for target in &project.targets {
      let resolver = Arc::clone(resolver);
      let project: ProjectRequest = project.clone();
      let target = *target;
      let handle = tokio::task::spawn_blocking(move || {
        let mut configuration = BuildConfiguration::new(project.output);
        resolver
          .add_external_dependencies(&mut configuration, &target, &project.name, &project.manifest)
          .with_context(|| format!("Failed to resolve {} for {}", project.name, target))?;
        Ok::<_, anyhow::Error>(ResolvedConfiguration {
          project: project.name,
          target,
          configuration,
        })
      });
      pending.push(handle);
    }
  }

  info!(configurations = pending.len(), "resolving");

  let mut resolved = Vec::with_capacity(pending.len());
  for handle in pending {
    resolved.push(handle.await.context("Resolution task panicked")??);
  }
  Ok(resolved)
}

fn apply_references(resolver: &Resolver, request: &Request, configurations: &mut [ResolvedConfiguration]) -> Result<()> {
  for resolved in configurations {
    let Some(project) = request.projects.iter().find(|p| p.name == resolved.project) else {
      continue;
    };
    for reference in &project.references {
      resolver
        .reference_external(
          &mut resolved.configuration,
          &resolved.target,
          &reference.project,
          &reference.packages,
        )
        .with_context(|| {
          format!(
            "{} ({}) failed to reference packages of {}",
            resolved.project, resolved.target, reference.project
          )
        })?;
    }
  }
  Ok(())
}
