use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures of the external tool itself.
#[derive(Debug, Error)]
pub enum ExternalToolError {
  /// The process could not be started.
  #[error("failed to launch {tool}: {source} (is conan installed and on PATH?)")]
  Spawn {
    tool: String,
    #[source]
    source: std::io::Error,
  },

  /// Waiting on the process failed.
  #[error("failed to wait for {tool}: {source}")]
  Wait {
    tool: String,
    #[source]
    source: std::io::Error,
  },

  /// The process exited unsuccessfully.
  #[error("{tool} install failed with exit code {code:?} in {working_dir}{}", format_stderr(.stderr))]
  Failed {
    tool: String,
    code: Option<i32>,
    working_dir: PathBuf,
    stderr: String,
  },

  /// The process did not finish in time and was killed.
  #[error("{tool} install did not finish within {timeout:?} in {working_dir}")]
  Timeout {
    tool: String,
    timeout: Duration,
    working_dir: PathBuf,
  },

  /// The process succeeded but left no build-info artifact behind.
  #[error("conan did not produce a build info file at {path}")]
  MissingArtifact { path: PathBuf },
}

fn format_stderr(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(":\n{}", stderr)
  }
}
