//! Config load validation tests for bundle-verdict-config.
// crates/bundle-verdict-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards and component construction.
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;

use bundle_verdict_config::BundleVerdictConfig;
use bundle_verdict_config::ConfigError;
use bundle_verdict_config::LogSinkKind;
use bundle_verdict_core::AnalysisEngine;
use bundle_verdict_core::Analyzer;
use tempfile::NamedTempFile;
use tempfile::TempDir;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<BundleVerdictConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(dir: &TempDir, body: &str) -> Result<std::path::PathBuf, String> {
    let path = dir.path().join("bundle-verdict.toml");
    fs::write(&path, body).map_err(|err| err.to_string())?;
    Ok(path)
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(BundleVerdictConfig::load(Some(path)), "config path is longer than 4096 bytes")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(
        BundleVerdictConfig::load(Some(path)),
        "config path has a segment longer than 255 bytes",
    )?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(
        BundleVerdictConfig::load(Some(file.path())),
        "config file is larger than 1048576 bytes",
    )?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(BundleVerdictConfig::load(Some(file.path())), "config file is not utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(BundleVerdictConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_out_of_range_file_limit() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, "[bundle]\nroot = \"/bundle\"\nmax_file_bytes = 0\n")?;
    assert_invalid(BundleVerdictConfig::load(Some(&path)), "max_file_bytes out of range")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_sink() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, "[bundle]\nroot = \"/b\"\n[logging]\nsink = \"syslog\"\n")?;
    assert_invalid(BundleVerdictConfig::load(Some(&path)), "config parse error")?;
    Ok(())
}

#[test]
fn loaded_config_builds_store_sink_and_engine() -> TestResult {
    let bundle = TempDir::new().map_err(|err| err.to_string())?;
    let system = bundle.path().join("host-collectors/system");
    fs::create_dir_all(&system).map_err(|err| err.to_string())?;
    fs::write(system.join("memory.json"), r#"{"total": 17179869184}"#)
        .map_err(|err| err.to_string())?;
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let log_path = dir.path().join("analysis.jsonl");
    let body = format!(
        "[bundle]\nroot = \"{}\"\n[logging]\nsink = \"file\"\npath = \"{}\"\n\
         [analysis]\ndedup_analyzers = false\n",
        toml_path(bundle.path()),
        toml_path(&log_path),
    );
    let path = write_config(&dir, &body)?;

    let config = BundleVerdictConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.logging.sink != LogSinkKind::File || config.engine_config().dedup_analyzers {
        return Err("config sections were not applied".to_string());
    }
    let store = config.build_store().map_err(|err| err.to_string())?;
    let sink = config.build_log_sink().map_err(|err| err.to_string())?;
    let analyzers: Vec<Analyzer> = serde_json::from_str(
        r#"[{"hostMemory": {"outcomes": [{"pass": {"when": ">= 8Gi", "message": "ok"}}]}},
            {"containerRuntime": {"outcomes": [{"pass": {"message": "ok"}}]}}]"#,
    )
    .map_err(|err| err.to_string())?;
    let report = AnalysisEngine::new(store, sink, config.engine_config()).run(&analyzers);
    if report.results.len() != 1 || report.failures.len() != 1 {
        return Err("expected one result and one failure".to_string());
    }
    let logged = fs::read_to_string(&log_path).map_err(|err| err.to_string())?;
    if !logged.contains("\"event\":\"analyzer_failed\"") {
        return Err(format!("log file missing failure event: {logged}"));
    }
    Ok(())
}

#[test]
fn build_store_reports_missing_bundle() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let missing = dir.path().join("missing");
    let config = BundleVerdictConfig::from_toml(&format!(
        "[bundle]\nroot = \"{}\"\n[logging]\nsink = \"none\"\n",
        toml_path(&missing)
    ))
    .map_err(|err| err.to_string())?;
    match config.build_store() {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error: {other}")),
        Ok(_) => Err("expected missing bundle to fail".to_string()),
    }
}
