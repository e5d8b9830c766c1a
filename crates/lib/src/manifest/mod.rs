//! Resolution manifests.
//!
//! A manifest describes the external packages one (project, target) pair needs
//! and renders to the `conanfile.txt` text that doubles as its cache fingerprint.

mod types;

pub use types::*;
