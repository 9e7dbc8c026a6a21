// crates/bundle-verdict-core/src/core/meta.rs
// ============================================================================
// Module: Bundle Verdict Analyzer Metadata
// Description: Shared analyzer metadata (check name, exclusion, strictness).
// Purpose: Resolve bool-like manifest flags consistently across analyzers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Analyzer manifests express `exclude` and `strict` either as booleans or as
//! bool-like strings (often produced by templating). [`BoolOrString`] accepts
//! both and resolves them with the usual literal set (`1`, `t`, `true`, ...).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::AnalyzeError;

// ============================================================================
// SECTION: Bool-like Values
// ============================================================================

/// Boolean flag that may be written as a bool or a bool-like string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoolOrString {
    /// Native boolean.
    Bool(bool),
    /// Bool-like string.
    String(String),
}

impl BoolOrString {
    /// Resolves the flag; an empty string is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Invalid`] when the string is not bool-like.
    pub fn resolve(&self) -> Result<bool, AnalyzeError> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::String(text) if text.trim().is_empty() => Ok(false),
            Self::String(text) => parse_bool_literal(text.trim()).ok_or_else(|| {
                AnalyzeError::Invalid(format!("'{text}' is not a boolean value"))
            }),
        }
    }
}

impl Default for BoolOrString {
    fn default() -> Self {
        Self::Bool(false)
    }
}

/// Parses the bool literal set accepted by analyzer manifests.
#[must_use]
pub fn parse_bool_literal(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

// ============================================================================
// SECTION: Analyzer Metadata
// ============================================================================

/// Metadata shared by every analyzer variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeMeta {
    /// Title override.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub check_name: String,
    /// Skip this analyzer when true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<BoolOrString>,
    /// Stamp results as strict when true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<BoolOrString>,
}

impl AnalyzeMeta {
    /// Returns the check name, or `default` when none is set.
    #[must_use]
    pub fn title_or(&self, default: &str) -> String {
        if self.check_name.is_empty() {
            default.to_string()
        } else {
            self.check_name.clone()
        }
    }

    /// Resolves the exclusion flag.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Invalid`] when `exclude` is not bool-like.
    pub fn is_excluded(&self) -> Result<bool, AnalyzeError> {
        self.exclude.as_ref().map_or(Ok(false), BoolOrString::resolve)
    }

    /// Resolves the strict flag.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Invalid`] when `strict` is not bool-like.
    pub fn is_strict(&self) -> Result<bool, AnalyzeError> {
        self.strict.as_ref().map_or(Ok(false), BoolOrString::resolve)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
