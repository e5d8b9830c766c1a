//! Lookup of a requested package in a resolved dependency graph.

use thiserror::Error;

use crate::build_info::{DependencyGraph, DependencyRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected exactly one dependency matching '{identifier}', found {count}")]
pub struct AmbiguousOrMissingDependencyError {
  pub identifier: String,
  pub count: usize,
}

/// True when `identifier` names `record` by its primary name or any alias, ignoring case.
pub fn is_match(record: &DependencyRecord, identifier: &str) -> bool {
  record
    .names()
    .any(|name| !name.is_empty() && name.eq_ignore_ascii_case(identifier))
}

/// Find the single record `identifier` refers to.
///
/// Zero or several matches are both errors: picking one of several candidates
/// would silently configure the wrong package.
pub fn match_dependency<'g>(
  graph: &'g DependencyGraph,
  identifier: &str,
) -> Result<&'g DependencyRecord, AmbiguousOrMissingDependencyError> {
  let mut matches = graph.iter().filter(|record| is_match(record, identifier));

  match (matches.next(), matches.count()) {
    (Some(record), 0) => Ok(record),
    (first, rest) => Err(AmbiguousOrMissingDependencyError {
      identifier: identifier.to_string(),
      count: usize::from(first.is_some()) + rest,
    }),
  }
}
