//! Build-info types.
//!
//! The `Raw*` structs mirror the subset of conan's `json` generator schema we
//! read. They are projected into [`DependencyGraph`] right after decoding so the
//! rest of the crate never sees conan's optional/nullable field layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a list that may be absent or `null`.
fn nullable_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBuildInfo {
  pub dependencies: Vec<RawDependency>,
  #[serde(default)]
  pub settings: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDependency {
  pub name: String,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub rootpath: Option<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub include_paths: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub lib_paths: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub bin_paths: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub libs: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub system_libs: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub defines: Vec<String>,
  /// Generator name -> the name that generator exposes the package under.
  #[serde(default)]
  pub names: Option<BTreeMap<String, serde_json::Value>>,
}

/// One resolved package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
  pub primary_name: String,
  /// Alternate identifiers build tooling may use, e.g. `GLEW` for `glew`.
  pub alias_names: Vec<String>,
  pub version: Option<String>,
  pub root_path: Option<String>,
  pub include_paths: Vec<String>,
  pub library_paths: Vec<String>,
  pub library_files: Vec<String>,
  pub system_libs: Vec<String>,
  pub bin_paths: Vec<String>,
  pub preprocessor_defines: Vec<String>,
}

impl DependencyRecord {
  pub fn new(primary_name: impl Into<String>) -> Self {
    Self {
      primary_name: primary_name.into(),
      ..Self::default()
    }
  }

  /// Primary name followed by every alias.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    std::iter::once(self.primary_name.as_str()).chain(self.alias_names.iter().map(String::as_str))
  }
}

impl DependencyRecord {
  pub(crate) fn from_raw(raw: RawDependency) -> Self {
    let mut alias_names: Vec<String> = Vec::new();
    for value in raw.names.into_iter().flat_map(BTreeMap::into_values) {
      if let serde_json::Value::String(alias) = value
        && !alias.is_empty()
        && alias != raw.name
        && !alias_names.contains(&alias)
      {
        alias_names.push(alias);
      }
    }

    Self {
      primary_name: raw.name,
      alias_names,
      version: raw.version,
      root_path: raw.rootpath,
      include_paths: raw.include_paths,
      library_paths: raw.lib_paths,
      library_files: raw.libs,
      system_libs: raw.system_libs,
      bin_paths: raw.bin_paths,
      preprocessor_defines: raw.defines,
    }
  }
}

/// Every package one `conan install` resolved, in the order conan reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
  pub records: Vec<DependencyRecord>,
  /// Settings conan echoed back for the install, string-valued entries only.
  pub settings: BTreeMap<String, String>,
}

impl DependencyGraph {
  pub fn new(records: Vec<DependencyRecord>) -> Self {
    Self {
      records,
      settings: BTreeMap::new(),
    }
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &DependencyRecord> {
    self.records.iter()
  }
}

impl DependencyGraph {
  pub(crate) fn from_raw(raw: RawBuildInfo) -> Self {
    let settings = raw
      .settings
      .unwrap_or_default()
      .into_iter()
      .filter_map(|(key, value)| match value {
        serde_json::Value::String(s) => Some((key, s)),
        _ => None,
      })
      .collect();

    Self {
      records: raw.dependencies.into_iter().map(DependencyRecord::from_raw).collect(),
      settings,
    }
  }
}
