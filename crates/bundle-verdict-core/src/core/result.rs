// crates/bundle-verdict-core/src/core/result.rs
// ============================================================================
// Module: Bundle Verdict Results
// Description: Resolved analyzer results and non-fatal warnings.
// Purpose: Define the sole externally visible product of analysis.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`AnalyzeResult`] is created once per matched outcome and is immutable
//! afterwards, except for the strict flag stamped by the owning analyzer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::kube::ObjectReference;
use crate::core::outcome::SingleOutcome;
use crate::core::outcome::Verdict;

// ============================================================================
// SECTION: Results
// ============================================================================

/// Resolved verdict for one analyzer unit.
///
/// # Invariants
/// - A resolved result carries exactly one verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// Rendered title.
    pub title: String,
    /// Rendered message.
    pub message: String,
    /// Documentation link.
    pub uri: String,
    /// Verdict; `None` only on neutral results built by callers.
    pub verdict: Option<Verdict>,
    /// Strict flag from the owning analyzer.
    pub strict: bool,
    /// Kubernetes object the result refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub involved_object: Option<ObjectReference>,
}

impl AnalyzeResult {
    /// Builds a result from a matched outcome slot.
    #[must_use]
    pub fn matched(title: impl Into<String>, verdict: Verdict, outcome: &SingleOutcome) -> Self {
        Self {
            title: title.into(),
            message: outcome.message.clone(),
            uri: outcome.uri.clone(),
            verdict: Some(verdict),
            strict: false,
            involved_object: None,
        }
    }

    /// Builds a result with a fixed message.
    #[must_use]
    pub fn with_message(
        title: impl Into<String>,
        verdict: Verdict,
        message: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            uri: String::new(),
            verdict: Some(verdict),
            strict: false,
            involved_object: None,
        }
    }

    /// Builds a neutral result that carries no verdict.
    #[must_use]
    pub fn neutral(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: String::new(),
            uri: String::new(),
            verdict: None,
            strict: false,
            involved_object: None,
        }
    }

    /// Returns true for a Pass verdict.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.verdict == Some(Verdict::Pass)
    }

    /// Returns true for a Warn verdict.
    #[must_use]
    pub fn is_warn(&self) -> bool {
        self.verdict == Some(Verdict::Warn)
    }

    /// Returns true for a Fail verdict.
    #[must_use]
    pub fn is_fail(&self) -> bool {
        self.verdict == Some(Verdict::Fail)
    }

    /// Returns true for a Fatal verdict.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.verdict == Some(Verdict::Fatal)
    }
}

// ============================================================================
// SECTION: Warnings
// ============================================================================

/// Non-fatal problem skipped during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeWarning {
    /// Title of the unit that produced the warning.
    pub subject: String,
    /// Warning text.
    pub message: String,
}

impl AnalyzeWarning {
    /// Creates a warning.
    #[must_use]
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Results and warnings produced by one analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerOutput {
    /// Resolved results in unit order.
    pub results: Vec<AnalyzeResult>,
    /// Non-fatal warnings in discovery order.
    pub warnings: Vec<AnalyzeWarning>,
}

impl AnalyzerOutput {
    /// Wraps a single result.
    #[must_use]
    pub fn single(result: AnalyzeResult) -> Self {
        Self {
            results: vec![result],
            warnings: Vec::new(),
        }
    }

    /// Stamps the strict flag on every result.
    pub fn stamp_strict(&mut self, strict: bool) {
        for result in &mut self.results {
            result.strict = strict;
        }
    }
}
