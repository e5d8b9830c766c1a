//! `conan install` subprocess.
//!
//! The child runs with its working directory set to the request's working
//! directory; the host process's own working directory is never touched, so
//! concurrent installs cannot observe each other's directory changes.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use super::{ExternalToolError, InstallRequest, Installer};
use crate::config::EngineConfig;
use crate::consts::CONANFILE_NAME;
use crate::error::ResolveError;
use crate::paths::{build_info_path, conanfile_path};

/// Lines of stderr kept in [`ExternalToolError::Failed`].
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct ConanInstaller {
  program: PathBuf,
  prefix_args: Vec<String>,
  build_policy: String,
  timeout: Option<Duration>,
}

impl ConanInstaller {
  pub fn new(config: &EngineConfig) -> Self {
    Self {
      program: config.tool.clone(),
      prefix_args: config.tool_args.clone(),
      build_policy: config.build_policy.clone(),
      timeout: config.timeout,
    }
  }

  fn tool_name(&self) -> String {
    self.program.display().to_string()
  }

  /// Full argument list: prefix args, `install ./conanfile.txt --build=<policy>`, then settings.
  pub fn args(&self, request: &InstallRequest<'_>) -> Vec<String> {
    let mut args = self.prefix_args.clone();
    args.push("install".to_string());
    args.push(format!("./{}", CONANFILE_NAME));
    args.push(format!("--build={}", self.build_policy));
    args.extend(request.settings.args());
    args
  }

  fn prepare(&self, request: &InstallRequest<'_>) -> Result<PathBuf, ResolveError> {
    let working_dir = request.working_dir;
    std::fs::create_dir_all(working_dir).map_err(|source| ResolveError::Io {
      path: working_dir.to_path_buf(),
      source,
    })?;

    let manifest_path = conanfile_path(working_dir);
    std::fs::write(&manifest_path, request.manifest.as_str()).map_err(|source| ResolveError::Io {
      path: manifest_path.clone(),
      source,
    })?;

    // A leftover artifact from an earlier run must not be mistaken for this run's output.
    let artifact = build_info_path(working_dir);
    match std::fs::remove_file(&artifact) {
      Ok(()) => debug!(path = %artifact.display(), "removed stale build info"),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
      Err(source) => return Err(ResolveError::Io { path: artifact, source }),
    }

    Ok(artifact)
  }

  fn wait(&self, child: &mut Child, working_dir: &Path) -> Result<ExitStatus, ExternalToolError> {
    let waited = match self.timeout {
      Some(timeout) => child.wait_timeout(timeout),
      None => child.wait().map(Some),
    };

    match waited {
      Ok(Some(status)) => Ok(status),
      Ok(None) => {
        let timeout = self.timeout.unwrap_or_default();
        warn!(tool = %self.tool_name(), ?timeout, "install timed out, killing process");
        reap(child);
        Err(ExternalToolError::Timeout {
          tool: self.tool_name(),
          timeout,
          working_dir: working_dir.to_path_buf(),
        })
      }
      Err(source) => {
        warn!(tool = %self.tool_name(), error = %source, "waiting on install failed, killing process");
        reap(child);
        Err(ExternalToolError::Wait {
          tool: self.tool_name(),
          source,
        })
      }
    }
  }
}

impl Installer for ConanInstaller {
  fn install(&self, request: &InstallRequest<'_>) -> Result<PathBuf, ResolveError> {
    let artifact = self.prepare(request)?;
    let args = self.args(request);

    info!(
      tool = %self.tool_name(),
      working_dir = %request.working_dir.display(),
      key = %request.manifest,
      settings = %request.settings,
      "running conan install"
    );
    debug!(?args, "spawning process");

    let started = Instant::now();
    let mut child = Command::new(&self.program)
      .args(&args)
      .current_dir(request.working_dir)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|source| ExternalToolError::Spawn {
        tool: self.tool_name(),
        source,
      })?;

    // Drain both pipes concurrently so a chatty install cannot fill a pipe and block.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    // After a timeout, grandchildren may still hold the pipes open; leave the readers detached.
    let status = self.wait(&mut child, request.working_dir)?;
    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();

    if !stdout.is_empty() {
      debug!(stdout = %stdout.trim_end(), "conan stdout");
    }
    if !stderr.is_empty() {
      debug!(stderr = %stderr.trim_end(), "conan stderr");
    }

    if !status.success() {
      return Err(
        ExternalToolError::Failed {
          tool: self.tool_name(),
          code: status.code(),
          working_dir: request.working_dir.to_path_buf(),
          stderr: tail(&stderr, STDERR_TAIL_LINES),
        }
        .into(),
      );
    }

    if !artifact.is_file() {
      return Err(ExternalToolError::MissingArtifact { path: artifact }.into());
    }

    info!(elapsed = ?started.elapsed(), artifact = %artifact.display(), "conan install finished");
    Ok(artifact)
  }
}

/// Kill `child` and collect its exit status. It may already have exited, so failures are ignored.
fn reap(child: &mut Child) {
  let _ = child.kill();
  let _ = child.wait();
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<String>
where
  R: Read + Send + 'static,
{
  std::thread::spawn(move || {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
      let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
  })
}

/// Last `lines` lines of `text`.
fn tail(text: &str, lines: usize) -> String {
  let all: Vec<&str> = text.trim_end().lines().collect();
  let start = all.len().saturating_sub(lines);
  all[start..].join("\n")
}
