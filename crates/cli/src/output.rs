//! Terminal rendering for resolution reports.
//!
//! Each resolved configuration, package record or conanfile gets a header line
//! followed by dimmed label blocks. Colors only apply when the stream supports
//! them; with `--output json` the commands hand their report to [`print_json`]
//! and nothing here is used.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use extdeps_lib::cache::CacheStats;
use extdeps_lib::merge::BuildConfiguration;
use extdeps_lib::target::TargetDescriptor;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod marks {
  pub const RESOLVED: &str = "✓";
  pub const FAILED: &str = "✗";
  pub const HEADER: &str = "•";
  pub const ENTRY: &str = "→";
}

/// Label and contents of every list a build configuration carries, in display order.
pub fn configuration_sections(config: &BuildConfiguration) -> [(&'static str, &[String]); 6] {
  [
    ("Include paths", config.include_paths.as_slice()),
    ("Library paths", config.library_paths.as_slice()),
    ("Libraries", config.library_files.as_slice()),
    ("Dependent libraries", config.dependent_library_files.as_slice()),
    ("Defines", config.defines.as_slice()),
    ("Exported defines", config.export_defines.as_slice()),
  ]
}

/// `Core (win64_vs2022_debug)`, the header of one resolved configuration.
pub fn configuration_label(project: &str, target: &TargetDescriptor) -> String {
  format!("{} ({})", project, target.target_string())
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_configuration(project: &str, target: &TargetDescriptor, config: &BuildConfiguration) {
  print_header(&configuration_label(project, target));
  for (label, values) in configuration_sections(config) {
    print_entries(label, values);
  }
}

/// Closing lines of `extdeps resolve`: how many configurations, and what the cache did.
pub fn print_resolve_summary(configurations: usize, stats: &CacheStats, elapsed: Duration) {
  println!(
    "{} Resolved {} configuration(s)",
    marks::RESOLVED.if_supports_color(Stream::Stdout, |s| s.green()),
    configurations
  );
  print_field("Installs", &stats.loads.to_string());
  print_field("Cache hits", &stats.hits.to_string());
  if stats.failures > 0 {
    print_field("Failed installs", &stats.failures.to_string());
  }
  print_field("Duration", &format_duration(elapsed));
}

pub fn print_failure(message: &str) {
  eprintln!(
    "{} {}",
    marks::FAILED.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_header(message: &str) {
  println!(
    "{} {}",
    marks::HEADER.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_field(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// Print a labelled list, one entry per line, skipping it entirely when empty.
pub fn print_entries(label: &str, values: &[String]) {
  if values.is_empty() {
    return;
  }
  println!("  {}:", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  for value in values {
    println!("    {} {}", marks::ENTRY, value);
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use extdeps_lib::merge::OutputKind;
  use extdeps_lib::target::{Compiler, Optimization, Platform, RuntimeLibrary};

  #[test]
  fn configuration_sections_follow_display_order() {
    let mut config = BuildConfiguration::new(OutputKind::Exe);
    config.include_paths.push("/pkg/glew/include");
    config.defines.push("GLEW_STATIC");

    let sections = configuration_sections(&config);
    let labels: Vec<&str> = sections.iter().map(|(label, _)| *label).collect();
    assert_eq!(
      labels,
      [
        "Include paths",
        "Library paths",
        "Libraries",
        "Dependent libraries",
        "Defines",
        "Exported defines"
      ]
    );
    assert_eq!(sections[0].1, ["/pkg/glew/include"]);
    assert_eq!(sections[4].1, ["GLEW_STATIC"]);
    assert!(sections[2].1.is_empty());
  }

  #[test]
  fn configuration_label_uses_target_string() {
    let target = TargetDescriptor::new(Platform::Win64, Optimization::Debug, Compiler::Vs2022);
    assert_eq!(configuration_label("Core", &target), "Core (win64_vs2022_debug)");

    let target = target.with_runtime(RuntimeLibrary::MultiThreadedDll);
    assert_eq!(configuration_label("Core", &target), "Core (win64_vs2022_debug_md)");
  }

  #[test]
  fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
    assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
  }
}
