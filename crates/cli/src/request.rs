//! Request files read by `resolve` and `conanfile`.
//!
//! ```json
//! {
//!   "projects": [
//!     {
//!       "name": "HelloWorld",
//!       "output": "exe",
//!       "targets": [{ "platform": "win64", "optimization": "debug", "compiler": "vs2022" }],
//!       "manifest": { "requires": ["glew/2.2.0"] },
//!       "references": [{ "project": "Core", "packages": ["GLEW"] }]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use extdeps_lib::manifest::Manifest;
use extdeps_lib::merge::OutputKind;
use extdeps_lib::target::TargetDescriptor;

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
  pub projects: Vec<ProjectRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRequest {
  pub name: String,
  #[serde(default)]
  pub output: OutputKind,
  pub targets: Vec<TargetDescriptor>,
  #[serde(default)]
  pub manifest: Manifest,
  /// Packages taken from other projects' resolved graphs.
  #[serde(default)]
  pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
  pub project: String,
  pub packages: Vec<String>,
}

impl Request {
  pub fn load(path: &Path) -> Result<Self> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read request {}", path.display()))?;
    Self::parse(&text).with_context(|| format!("Invalid request {}", path.display()))
  }

  pub fn parse(text: &str) -> Result<Self> {
    let request: Request = serde_json::from_str(text)?;
    request.validate()?;
    Ok(request)
  }

  fn validate(&self) -> Result<()> {
    let mut names = HashSet::new();
    for project in &self.projects {
      if project.name.trim().is_empty() {
        bail!("project names must not be empty");
      }
      if !names.insert(project.name.as_str()) {
        bail!("project '{}' is listed more than once", project.name);
      }
    }

    for project in &self.projects {
      for reference in &project.references {
        let Some(source) = self.projects.iter().find(|p| p.name == reference.project) else {
          bail!("project '{}' references unknown project '{}'", project.name, reference.project);
        };
        if let Some(target) = project.targets.iter().find(|t| !source.targets.contains(t)) {
          bail!(
            "project '{}' references '{}' for target {}, which '{}' does not build",
            project.name,
            reference.project,
            target,
            reference.project
          );
        }
      }
    }

    Ok(())
  }

  /// Number of (project, target) pairs.
  pub fn configuration_count(&self) -> usize {
    self.projects.iter().map(|p| p.targets.len()).sum()
  }
}
