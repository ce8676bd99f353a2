//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;

use argbind::{ErrorCode, ParseResult};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Codes of all recorded errors, in order.
pub fn error_codes(result: &ParseResult) -> Vec<ErrorCode> {
    result.errors().iter().map(|error| error.code).collect()
}

/// Subjects of the errors with the given code.
pub fn error_subjects(result: &ParseResult, code: ErrorCode) -> Vec<String> {
    result
        .errors_with(code)
        .map(|error| error.subject.clone())
        .collect()
}

/// Write a parser configuration file into a fresh temp directory.
pub fn temp_parser_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("parser.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
