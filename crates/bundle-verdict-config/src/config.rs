// crates/bundle-verdict-config/src/config.rs
// ============================================================================
// Module: Bundle Verdict Configuration
// Description: Configuration loading and validation for analysis runs.
// Purpose: Provide strict, fail-closed config parsing with safe defaults.
// Dependencies: bundle-verdict-core, bundle-verdict-store, serde, toml
// ============================================================================

//! ## Overview
//! This module defines the configuration schema for an analysis run and
//! validates it against strict limits. A config names the unpacked bundle,
//! where analysis events are logged, and engine options. Inputs are
//! untrusted and rejected on any ambiguity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use bundle_verdict_core::AnalysisEngineConfig;
use bundle_verdict_core::AnalysisLogSink;
use bundle_verdict_core::FileLogSink;
use bundle_verdict_core::NoopLogSink;
use bundle_verdict_core::StderrLogSink;
use bundle_verdict_store::DirectoryEvidenceStore;
use bundle_verdict_store::DirectoryStoreConfig;
use bundle_verdict_store::DirectoryStoreError;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Config file looked up in the working directory.
const DEFAULT_CONFIG_NAME: &str = "bundle-verdict.toml";
/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "BUNDLE_VERDICT_CONFIG";
/// Largest config file read, in bytes.
pub const MAX_CONFIG_BYTES: u64 = 1024 * 1024;
/// Longest config or log path accepted, in bytes.
const MAX_PATH_BYTES: usize = 4096;
/// Longest single path segment accepted, in bytes.
const MAX_SEGMENT_BYTES: usize = 255;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level configuration for an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleVerdictConfig {
    /// Bundle location and read limits.
    pub bundle: DirectoryStoreConfig,
    /// Analysis event logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Engine options.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl BundleVerdictConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, [`CONFIG_ENV_VAR`], then
    /// `bundle-verdict.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => env::var_os(CONFIG_ENV_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from),
        };
        check_path("config path", &path)?;
        let content = read_config_text(&path)?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is not valid TOML or fails
    /// validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bundle.validate().map_err(|err| ConfigError::Invalid(format!("bundle: {err}")))?;
        self.logging.validate()
    }

    /// Opens the evidence store named by `[bundle]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bundle root cannot be opened.
    pub fn build_store(&self) -> Result<DirectoryEvidenceStore, ConfigError> {
        DirectoryEvidenceStore::new(self.bundle.clone()).map_err(|err| match err {
            DirectoryStoreError::Io(message) => ConfigError::Io(message),
            other => ConfigError::Invalid(other.to_string()),
        })
    }

    /// Builds the log sink named by `[logging]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a file sink cannot be opened.
    pub fn build_log_sink(&self) -> Result<Box<dyn AnalysisLogSink>, ConfigError> {
        match (self.logging.sink, &self.logging.path) {
            (LogSinkKind::Stderr, _) => Ok(Box::new(StderrLogSink)),
            (LogSinkKind::None, _) => Ok(Box::new(NoopLogSink)),
            (LogSinkKind::File, Some(path)) => FileLogSink::new(path)
                .map(|sink| Box::new(sink) as Box<dyn AnalysisLogSink>)
                .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display()))),
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("logging.path required for file sink".to_string()))
            }
        }
    }

    /// Engine options derived from `[analysis]`.
    #[must_use]
    pub const fn engine_config(&self) -> AnalysisEngineConfig {
        AnalysisEngineConfig {
            dedup_analyzers: self.analysis.dedup_analyzers,
        }
    }
}

/// Destination of analysis log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `logging.path`.
    File,
    /// Discard events.
    None,
}

/// Logging configuration.
///
/// # Invariants
/// - `path` is set if and only if `sink` is [`LogSinkKind::File`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LoggingConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: LogSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Validates sink and path pairing.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("logging.path required for file sink".to_string()))
            }
            (LogSinkKind::File, Some(path)) => check_path("logging.path", path),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("logging.path only allowed for file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

/// Engine options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AnalysisConfig {
    /// Skip analyzers repeated verbatim in a manifest.
    #[serde(default = "default_dedup_analyzers")]
    pub dedup_analyzers: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dedup_analyzers: default_dedup_analyzers(),
        }
    }
}

/// Default for `analysis.dedup_analyzers`.
const fn default_dedup_analyzers() -> bool {
    true
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects blank paths and paths over the byte limits.
fn check_path(label: &str, path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{label} is empty")));
    }
    if text.len() > MAX_PATH_BYTES {
        return Err(ConfigError::Invalid(format!(
            "{label} is longer than {MAX_PATH_BYTES} bytes"
        )));
    }
    if path.components().any(|segment| segment.as_os_str().len() > MAX_SEGMENT_BYTES) {
        return Err(ConfigError::Invalid(format!(
            "{label} has a segment longer than {MAX_SEGMENT_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Reads the config file as UTF-8, bounded by [`MAX_CONFIG_BYTES`].
fn read_config_text(path: &Path) -> Result<String, ConfigError> {
    let io_error = |err: std::io::Error| ConfigError::Io(format!("{}: {err}", path.display()));
    let file = File::open(path).map_err(io_error)?;
    let mut bytes = Vec::new();
    file.take(MAX_CONFIG_BYTES.saturating_add(1)).read_to_end(&mut bytes).map_err(io_error)?;
    if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > MAX_CONFIG_BYTES {
        return Err(ConfigError::Invalid(format!(
            "config file is larger than {MAX_CONFIG_BYTES} bytes"
        )));
    }
    String::from_utf8(bytes).map_err(|err| {
        ConfigError::Invalid(format!(
            "config file is not utf-8 (invalid byte at offset {})",
            err.utf8_error().valid_up_to()
        ))
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = BundleVerdictConfig::from_toml("[bundle]\nroot = \"/bundle\"\n").unwrap();
        assert_eq!(config.bundle.root, PathBuf::from("/bundle"));
        assert_eq!(config.logging.sink, LogSinkKind::Stderr);
        assert!(config.engine_config().dedup_analyzers);
    }

    #[test]
    fn missing_bundle_section_is_a_parse_error() {
        let err = BundleVerdictConfig::from_toml("[analysis]\ndedup_analyzers = false\n");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn file_sink_requires_path() {
        let text = "[bundle]\nroot = \"/b\"\n[logging]\nsink = \"file\"\n";
        let err = BundleVerdictConfig::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("logging.path required"));
    }

    #[test]
    fn path_without_file_sink_is_rejected() {
        let text = "[bundle]\nroot = \"/b\"\n[logging]\nsink = \"none\"\npath = \"a.log\"\n";
        let err = BundleVerdictConfig::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("only allowed for file sink"));
    }

    #[test]
    fn check_path_rejects_blank_and_overlong_segments() {
        let blank = check_path("logging.path", Path::new("   ")).unwrap_err();
        assert_eq!(blank.to_string(), "invalid config: logging.path is empty");
        let segment = format!("logs/{}", "a".repeat(MAX_SEGMENT_BYTES + 1));
        let err = check_path("logging.path", Path::new(&segment)).unwrap_err();
        assert!(err.to_string().contains("has a segment longer than 255 bytes"));
        assert!(check_path("logging.path", Path::new("./logs/analysis.jsonl")).is_ok());
    }

    #[test]
    fn blank_log_path_is_rejected_for_file_sink() {
        let text = "[bundle]\nroot = \"/b\"\n[logging]\nsink = \"file\"\npath = \" \"\n";
        let err = BundleVerdictConfig::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("logging.path is empty"));
    }
}
