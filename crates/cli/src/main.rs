mod cmd;
mod output;
mod request;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use extdeps_lib::config::EngineConfig;
use extdeps_lib::target::{Compiler, Optimization, Platform, RuntimeLibrary};

use crate::output::{OutputFormat, print_failure};

/// extdeps - native third-party dependency resolution through conan
#[derive(Parser)]
#[command(name = "extdeps")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Package manager program (default: conan, or EXTDEPS_CONAN)
  #[arg(long, global = true)]
  tool: Option<PathBuf>,

  /// Argument placed before `install` on every tool invocation (repeatable)
  #[arg(long = "tool-arg", global = true, allow_hyphen_values = true)]
  tool_args: Vec<String>,

  /// Root directory for generated conan files (default: EXTDEPS_ROOT or the user cache)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Maximum time a single install may run, e.g. "90s" or "5m"
  #[arg(long, global = true, value_parser = humantime::parse_duration)]
  timeout: Option<Duration>,

  /// Also pass compiler.version to conan
  #[arg(long, global = true)]
  pin_compiler_version: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve every project of a request file and print the merged configurations
  Resolve {
    /// Path to the request file
    request: PathBuf,
  },

  /// Print the conanfile each project of a request file would install
  Conanfile {
    /// Path to the request file
    request: PathBuf,
  },

  /// Print the conan settings for a target
  Settings {
    #[arg(long)]
    platform: Platform,

    #[arg(long)]
    optimization: Optimization,

    #[arg(long)]
    compiler: Compiler,

    /// C runtime library (MT, MTd, MD, MDd)
    #[arg(long)]
    runtime: Option<RuntimeLibrary>,
  },

  /// List the packages of a conanbuildinfo.json
  Inspect {
    /// Path to conanbuildinfo.json
    file: PathBuf,

    /// Show only the package matching this name or alias
    #[arg(long)]
    find: Option<String>,
  },
}

impl Cli {
  fn engine_config(&self) -> Result<EngineConfig> {
    let mut config = EngineConfig::from_env().context("Invalid environment configuration")?;
    if let Some(tool) = &self.tool {
      config = config.with_tool(tool);
    }
    if !self.tool_args.is_empty() {
      config = config.with_tool_args(self.tool_args.iter().cloned());
    }
    if let Some(root) = &self.root {
      config = config.with_generated_root(root);
    }
    if self.timeout.is_some() {
      config = config.with_timeout(self.timeout);
    }
    config.pin_compiler_version |= self.pin_compiler_version;
    Ok(config)
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  match &cli.command {
    Commands::Resolve { request } => cmd::cmd_resolve(request, cli.engine_config()?, cli.output),
    Commands::Conanfile { request } => cmd::cmd_conanfile(request, cli.output),
    Commands::Settings {
      platform,
      optimization,
      compiler,
      runtime,
    } => cmd::cmd_settings(
      *platform,
      *optimization,
      *compiler,
      *runtime,
      cli.engine_config()?.pin_compiler_version,
      cli.output,
    ),
    Commands::Inspect { file, find } => cmd::cmd_inspect(file, find.as_deref(), cli.output),
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_failure(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
