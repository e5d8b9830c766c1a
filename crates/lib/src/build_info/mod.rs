//! Parsing of `conanbuildinfo.json`.
//!
//! Individual fields are optional (absent or `null` lists read as empty), but
//! a file that is not JSON, lacks the `dependencies` array, or has fields of the
//! wrong type is rejected as a whole.

mod types;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use types::{DependencyGraph, DependencyRecord};
use types::RawBuildInfo;

#[derive(Debug, Error)]
pub enum MalformedBuildInfoError {
  #[error("failed to read build info {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("build info {path} does not match the conan json schema: {source}")]
  Decode {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Read and decode a build-info artifact.
pub fn parse(path: &Path) -> Result<DependencyGraph, MalformedBuildInfoError> {
  let text = std::fs::read_to_string(path).map_err(|source| MalformedBuildInfoError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let graph = parse_str(&text).map_err(|source| MalformedBuildInfoError::Decode {
    path: path.to_path_buf(),
    source,
  })?;

  debug!(path = %path.display(), dependencies = graph.len(), "parsed build info");
  Ok(graph)
}

/// Decode build-info JSON text.
pub fn parse_str(text: &str) -> Result<DependencyGraph, serde_json::Error> {
  let raw: RawBuildInfo = serde_json::from_str(text)?;
  Ok(DependencyGraph::from_raw(raw))
}
