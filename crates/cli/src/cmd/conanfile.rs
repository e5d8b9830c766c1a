use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::output::{OutputFormat, print_header, print_json};
use crate::request::Request;

#[derive(Debug, Serialize)]
struct ConanfileEntry {
  project: String,
  digest: String,
  conanfile: String,
}

/// Print each project's conanfile without running the tool.
pub fn cmd_conanfile(path: &Path, output: OutputFormat) -> Result<()> {
  let request = Request::load(path)?;

  let entries: Vec<ConanfileEntry> = request
    .projects
    .iter()
    .map(|project| {
      let key = project.manifest.serialize();
      ConanfileEntry {
        project: project.name.clone(),
        digest: key.digest(),
        conanfile: key.as_str().to_string(),
      }
    })
    .collect();

  if output.is_json() {
    return print_json(&entries);
  }

  for entry in &entries {
    print_header(&format!("{} [{}]", entry.project, entry.digest));
    print!("{}", entry.conanfile);
    println!();
  }
  Ok(())
}
