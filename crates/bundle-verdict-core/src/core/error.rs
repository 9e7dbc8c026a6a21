// crates/bundle-verdict-core/src/core/error.rs
// ============================================================================
// Module: Bundle Verdict Analysis Errors
// Description: Error taxonomy for analyzer resolution.
// Purpose: Give callers a stable classification of per-analyzer failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every analyzer returns [`AnalyzeError`] when it cannot produce a verdict.
//! The engine reports these as analyzer-level failures, distinct from a Fail
//! verdict, and continues with the remaining analyzers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Analyze Error
// ============================================================================

/// Analyzer resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - The core never retries; every variant is returned to the immediate caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// Evidence path is absent from the bundle.
    #[error("evidence not found: {0}")]
    NotFound(String),
    /// Evidence store failed for a reason other than absence.
    #[error("evidence store error: {0}")]
    Store(String),
    /// Evidence bytes do not decode into the expected shape.
    #[error("evidence decode error: {0}")]
    Decode(String),
    /// When-clause is malformed.
    #[error("condition parse error: {0}")]
    ConditionParse(String),
    /// Message template is invalid or references an unknown field.
    #[error("template error: {0}")]
    Template(String),
    /// A remote node artifact was unreadable during fan-out resolution.
    #[error("fan-out resolution failed: {0}")]
    PartialFanout(String),
    /// Analyzer definition is unusable.
    #[error("invalid analyzer: {0}")]
    Invalid(String),
}

impl AnalyzeError {
    /// Builds a decode error that names the evidence it came from.
    #[must_use]
    pub fn decode(what: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode(format!("failed to decode {what}: {err}"))
    }

    /// Returns true when the error marks absent evidence.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
