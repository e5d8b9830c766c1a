//! extdeps-lib: native third-party dependency resolution for build generators
//!
//! This crate turns a declarative list of external packages into concrete
//! compiler/linker facts by driving the `conan` package manager:
//! - `Manifest`: the requires/options/imports of one resolution request
//! - `TargetDescriptor`: the build target, mapped to conan settings
//! - `ResolutionCache`: at most one `conan install` per distinct request
//! - `DependencyGraph`: the parsed `conanbuildinfo.json`
//! - `Resolver`: matches packages and merges them into a `BuildConfiguration`

pub mod build_info;
pub mod cache;
pub mod config;
pub mod consts;
pub mod error;
pub mod manifest;
pub mod matcher;
pub mod merge;
pub mod paths;
pub mod process;
pub mod resolver;
pub mod target;

pub use error::ResolveError;
pub use resolver::Resolver;
