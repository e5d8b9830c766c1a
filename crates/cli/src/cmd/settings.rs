use anyhow::{Context, Result};

use extdeps_lib::target::{Compiler, Optimization, Platform, RuntimeLibrary, TargetDescriptor, settings_for};

use crate::output::{OutputFormat, print_json};

pub fn cmd_settings(
  platform: Platform,
  optimization: Optimization,
  compiler: Compiler,
  runtime: Option<RuntimeLibrary>,
  pin_compiler_version: bool,
  output: OutputFormat,
) -> Result<()> {
  let mut target = TargetDescriptor::new(platform, optimization, compiler);
  if let Some(runtime) = runtime {
    target = target.with_runtime(runtime);
  }

  let settings = settings_for(&target, pin_compiler_version).context("Unsupported target")?;

  if output.is_json() {
    return print_json(&settings);
  }

  for setting in settings.iter() {
    println!("{}", setting);
  }
  Ok(())
}
