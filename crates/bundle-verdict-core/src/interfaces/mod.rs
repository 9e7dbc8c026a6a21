// crates/bundle-verdict-core/src/interfaces/mod.rs
// ============================================================================
// Module: Bundle Verdict Interfaces
// Description: Backend-agnostic interfaces for evidence access and logging.
// Purpose: Define the contract surfaces used by the analysis runtime.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how analysis integrates with an unpacked bundle and a
//! log pipeline without embedding backend details. Evidence access is
//! read-only; implementations must report absence as [`StoreError::NotFound`]
//! so resolvers can fall back instead of failing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use thiserror::Error;

use crate::core::AnalyzeError;

// ============================================================================
// SECTION: Evidence Store
// ============================================================================

/// Evidence store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `NotFound` is reserved for absent evidence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Evidence path is absent.
    #[error("evidence not found: {0}")]
    NotFound(String),
    /// I/O failure while reading evidence.
    #[error("evidence io error: {0}")]
    Io(String),
    /// Path or pattern is not acceptable.
    #[error("invalid evidence request: {0}")]
    Invalid(String),
    /// Evidence exceeds the configured size limit.
    #[error("evidence too large: {0}")]
    TooLarge(String),
}

impl From<StoreError> for AnalyzeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(path) => Self::NotFound(path),
            other => Self::Store(other.to_string()),
        }
    }
}

/// Read-only access to an unpacked bundle.
pub trait EvidenceStore {
    /// Reads one artifact by bundle-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the path is absent, or another
    /// [`StoreError`] when it cannot be read.
    fn get_file(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Reads every artifact matching `pattern`, minus those matching any
    /// `exclude` pattern. No match is an empty map, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a pattern is invalid or a match cannot be read.
    fn find_files(
        &self,
        pattern: &str,
        exclude: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>, StoreError>;
}

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Structured analysis log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisLogEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Analyzer title.
    pub analyzer: String,
    /// Event detail.
    pub message: String,
}

impl AnalysisLogEvent {
    /// Analyzer skipped by its exclude flag.
    pub const ANALYZER_EXCLUDED: &'static str = "analyzer_excluded";
    /// Analyzer returned an error.
    pub const ANALYZER_FAILED: &'static str = "analyzer_failed";
    /// Analyzer produced no results.
    pub const NO_OUTCOME_MATCHED: &'static str = "no_outcome_matched";
    /// Non-fatal warning raised during resolution.
    pub const ANALYSIS_WARNING: &'static str = "analysis_warning";

    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(event: &'static str, analyzer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            event,
            timestamp_ms: now_ms(),
            analyzer: analyzer.into(),
            message: message.into(),
        }
    }
}

/// Sink for analysis log events.
pub trait AnalysisLogSink: Send + Sync {
    /// Records an event. Sinks never fail the analysis.
    fn record(&self, event: &AnalysisLogEvent);
}

/// Current wall-clock time in milliseconds since epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}
