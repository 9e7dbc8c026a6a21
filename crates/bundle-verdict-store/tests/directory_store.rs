// crates/bundle-verdict-store/tests/directory_store.rs
// ============================================================================
// Module: Directory Store Tests
// Description: Filesystem tests for the directory evidence store.
// Purpose: Validate root confinement, size limits, globbing and engine use.
// ============================================================================

//! ## Overview
//! Tests for the directory-backed evidence store:
//! - Config defaults and limit validation
//! - Path confinement (parent and absolute paths)
//! - Per-file size limits
//! - Glob listing with exclusions
//! - A full engine run over an on-disk bundle

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::Path;

use bundle_verdict_core::AnalysisEngine;
use bundle_verdict_core::AnalysisEngineConfig;
use bundle_verdict_core::Analyzer;
use bundle_verdict_core::EvidenceStore;
use bundle_verdict_core::NoopLogSink;
use bundle_verdict_core::StoreError;
use bundle_verdict_store::DEFAULT_MAX_FILE_BYTES;
use bundle_verdict_store::DirectoryEvidenceStore;
use bundle_verdict_store::DirectoryStoreConfig;
use bundle_verdict_store::DirectoryStoreError;
use bundle_verdict_store::MAX_FILE_BYTES_LIMIT;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn bundle() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "host-collectors/system/memory.json", r#"{"total": 4294967296}"#);
    write(dir.path(), "logs/app/server.log", "started\nready\n");
    write(dir.path(), "logs/app/server-debug.log", "verbose\n");
    write(dir.path(), "logs/worker/worker.log", "panic: out of memory\n");
    dir
}

fn open(dir: &TempDir) -> DirectoryEvidenceStore {
    DirectoryEvidenceStore::new(DirectoryStoreConfig::new(dir.path())).unwrap()
}

// ============================================================================
// SECTION: Config
// ============================================================================

#[test]
fn config_defaults_read_limit() {
    let config: DirectoryStoreConfig = serde_json::from_value(json!({"root": "/bundle"})).unwrap();
    assert_eq!(config.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_out_of_range_limits() {
    let mut config = DirectoryStoreConfig::new("/bundle");
    config.max_file_bytes = 0;
    assert!(matches!(config.validate(), Err(DirectoryStoreError::Invalid(_))));
    config.max_file_bytes = MAX_FILE_BYTES_LIMIT + 1;
    assert!(matches!(config.validate(), Err(DirectoryStoreError::Invalid(_))));
}

#[test]
fn root_must_exist_and_be_a_directory() {
    let dir = bundle();
    let missing = DirectoryStoreConfig::new(dir.path().join("missing"));
    assert!(matches!(DirectoryEvidenceStore::new(missing), Err(DirectoryStoreError::Io(_))));
    let file = DirectoryStoreConfig::new(dir.path().join("logs/app/server.log"));
    assert!(matches!(DirectoryEvidenceStore::new(file), Err(DirectoryStoreError::Invalid(_))));
}

#[test]
fn overlong_root_component_is_rejected() {
    let config = DirectoryStoreConfig::new(format!("/tmp/{}", "a".repeat(300)));
    assert!(matches!(config.validate(), Err(DirectoryStoreError::Invalid(_))));
}

// ============================================================================
// SECTION: Reads
// ============================================================================

#[test]
fn reads_files_by_relative_path() {
    let dir = bundle();
    let store = open(&dir);
    let bytes = store.get_file("logs/app/server.log").unwrap();
    assert_eq!(bytes, b"started\nready\n");
    assert_eq!(store.get_file("./logs/app/server.log").unwrap(), bytes);
}

#[test]
fn missing_files_are_not_found() {
    let dir = bundle();
    let store = open(&dir);
    assert_eq!(
        store.get_file("cluster-resources/nodes.json"),
        Err(StoreError::NotFound("cluster-resources/nodes.json".to_string()))
    );
}

#[test]
fn paths_cannot_leave_the_root() {
    let dir = bundle();
    let store = open(&dir);
    assert!(matches!(store.get_file("../etc/passwd"), Err(StoreError::Invalid(_))));
    assert!(matches!(store.get_file("logs/../../secret"), Err(StoreError::Invalid(_))));
    assert!(matches!(store.get_file("/etc/passwd"), Err(StoreError::Invalid(_))));
    assert!(matches!(store.get_file(""), Err(StoreError::Invalid(_))));
    assert!(matches!(store.get_file("logs/app"), Err(StoreError::Invalid(_))));
}

#[cfg(unix)]
#[test]
fn symlinks_out_of_the_root_are_rejected() {
    let outside = tempfile::tempdir().unwrap();
    write(outside.path(), "secret.txt", "token");
    let dir = bundle();
    std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("leak.txt"))
        .unwrap();
    let store = open(&dir);
    assert!(matches!(store.get_file("leak.txt"), Err(StoreError::Invalid(_))));
    assert!(store.find_files("*.txt", &[]).unwrap().is_empty());
}

#[test]
fn oversized_files_are_rejected() {
    let dir = bundle();
    let mut config = DirectoryStoreConfig::new(dir.path());
    config.max_file_bytes = 8;
    let store = DirectoryEvidenceStore::new(config).unwrap();
    match store.get_file("logs/app/server.log") {
        Err(StoreError::TooLarge(message)) => {
            assert_eq!(message, "14 bytes exceeds limit of 8");
        }
        other => panic!("expected size limit error, got {other:?}"),
    }
    assert_eq!(store.get_file("logs/app/server-debug.log").unwrap(), b"verbose\n");
}

// ============================================================================
// SECTION: Globbing
// ============================================================================

#[test]
fn find_files_matches_within_segments() {
    let dir = bundle();
    let store = open(&dir);
    let found = store.find_files("logs/app/*.log", &[]).unwrap();
    let names: Vec<_> = found.keys().map(String::as_str).collect();
    assert_eq!(names, ["logs/app/server-debug.log", "logs/app/server.log"]);
}

#[test]
fn find_files_applies_exclusions_and_double_star() {
    let dir = bundle();
    let store = open(&dir);
    let exclude = vec!["logs/app/*-debug.log".to_string()];
    let found = store.find_files("logs/**/*.log", &exclude).unwrap();
    let names: Vec<_> = found.keys().map(String::as_str).collect();
    assert_eq!(names, ["logs/app/server.log", "logs/worker/worker.log"]);
}

#[test]
fn find_files_under_missing_directory_is_empty() {
    let dir = bundle();
    let store = open(&dir);
    assert!(store.find_files("cluster-resources/pods/*.json", &[]).unwrap().is_empty());
}

// ============================================================================
// SECTION: Engine
// ============================================================================

#[test]
fn engine_runs_against_an_extracted_bundle() {
    let dir = bundle();
    let analyzers: Vec<Analyzer> = serde_json::from_value(json!([
        {"hostMemory": {"outcomes": [
            {"fail": {"when": "< 8Gi", "message": "needs 8Gi"}},
            {"pass": {"message": "ok"}}
        ]}},
        {"textAnalyze": {"collectorName": "logs", "fileName": "worker/*.log",
                         "regex": "panic:", "outcomes": [
            {"fail": {"when": "true", "message": "worker panicked"}},
            {"pass": {"when": "false", "message": "worker healthy"}}
        ]}}
    ]))
    .unwrap();
    let engine = AnalysisEngine::new(open(&dir), NoopLogSink, AnalysisEngineConfig::default());
    let report = engine.run(&analyzers);
    assert!(report.failures.is_empty());
    let messages: Vec<_> = report.results.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["needs 8Gi", "worker panicked"]);
}
