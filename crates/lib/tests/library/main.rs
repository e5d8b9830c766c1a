//! Library integration tests.

mod common;
mod resolve_tests;
