//! Integration tests for deploy-preflight.
//!
//! These tests drive the checks and both binaries against mocked commands,
//! HTTP endpoints and temporary application trees.

pub mod full_run_tests;
