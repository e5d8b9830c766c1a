use std::path::Path;

use anyhow::{Context, Result};

use extdeps_lib::build_info::{self, DependencyRecord};
use extdeps_lib::matcher::match_dependency;

use crate::output::{OutputFormat, print_entries, print_field, print_header, print_json};

/// List the packages of a build-info file, or show the one matching `find`.
pub fn cmd_inspect(path: &Path, find: Option<&str>, output: OutputFormat) -> Result<()> {
  let graph = build_info::parse(path).context("Failed to load build info")?;

  let records: Vec<&DependencyRecord> = match find {
    Some(identifier) => vec![match_dependency(&graph, identifier)?],
    None => graph.iter().collect(),
  };

  if output.is_json() {
    return print_json(&records);
  }

  for record in &records {
    let version = record.version.as_deref().unwrap_or("?");
    print_header(&format!("{}/{}", record.primary_name, version));
    if !record.alias_names.is_empty() {
      print_field("Aliases", &record.alias_names.join(", "));
    }
    if find.is_some() {
      if let Some(root) = &record.root_path {
        print_field("Root", root);
      }
      print_entries("Include paths", &record.include_paths);
      print_entries("Library paths", &record.library_paths);
      print_entries("Libraries", &record.library_files);
      print_entries("System libraries", &record.system_libs);
      print_entries("Defines", &record.preprocessor_defines);
    }
  }

  if find.is_none() {
    println!();
    print_field("Packages", &graph.len().to_string());
  }
  Ok(())
}
