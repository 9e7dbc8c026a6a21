// crates/bundle-verdict-core/src/core/outcome.rs
// ============================================================================
// Module: Bundle Verdict Outcomes
// Description: Candidate verdicts guarded by when-clauses.
// Purpose: Model the ordered outcome list every analyzer resolves.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`Outcome`] carries exactly one populated verdict slot. The slot order
//! Fatal, Fail, Warn, Pass is the priority used when a malformed outcome
//! populates more than one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Verdict assigned by a matched outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Check passed.
    Pass,
    /// Check produced a warning.
    Warn,
    /// Check failed.
    Fail,
    /// Check failed and analysis should be treated as fatal.
    Fatal,
}

impl Verdict {
    /// Returns the lowercase label for the verdict.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Guarded message for one verdict slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleOutcome {
    /// When-clause; empty means unconditional.
    pub when: String,
    /// Message template.
    pub message: String,
    /// Documentation link.
    pub uri: String,
}

impl SingleOutcome {
    /// Creates a guarded outcome with no URI.
    #[must_use]
    pub fn new(when: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            when: when.into(),
            message: message.into(),
            uri: String::new(),
        }
    }

    /// Attaches a documentation link.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }
}

/// One entry in an analyzer's ordered outcome list.
///
/// # Invariants
/// - Well-formed outcomes populate exactly one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outcome {
    /// Fatal slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<SingleOutcome>,
    /// Fail slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail: Option<SingleOutcome>,
    /// Warn slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn: Option<SingleOutcome>,
    /// Pass slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<SingleOutcome>,
}

impl Outcome {
    /// Creates an outcome with the given slot populated.
    #[must_use]
    pub fn new(verdict: Verdict, outcome: SingleOutcome) -> Self {
        let mut out = Self::default();
        match verdict {
            Verdict::Pass => out.pass = Some(outcome),
            Verdict::Warn => out.warn = Some(outcome),
            Verdict::Fail => out.fail = Some(outcome),
            Verdict::Fatal => out.fatal = Some(outcome),
        }
        out
    }

    /// Shorthand for a Pass outcome.
    #[must_use]
    pub fn pass(when: &str, message: &str) -> Self {
        Self::new(Verdict::Pass, SingleOutcome::new(when, message))
    }

    /// Shorthand for a Warn outcome.
    #[must_use]
    pub fn warn(when: &str, message: &str) -> Self {
        Self::new(Verdict::Warn, SingleOutcome::new(when, message))
    }

    /// Shorthand for a Fail outcome.
    #[must_use]
    pub fn fail(when: &str, message: &str) -> Self {
        Self::new(Verdict::Fail, SingleOutcome::new(when, message))
    }

    /// Shorthand for a Fatal outcome.
    #[must_use]
    pub fn fatal(when: &str, message: &str) -> Self {
        Self::new(Verdict::Fatal, SingleOutcome::new(when, message))
    }

    /// Returns the highest-priority populated slot.
    #[must_use]
    pub fn verdict(&self) -> Option<(Verdict, &SingleOutcome)> {
        self.slots().into_iter().next()
    }

    /// Returns the number of populated slots.
    #[must_use]
    pub fn populated(&self) -> usize {
        self.slots().len()
    }

    /// Populated slots in priority order.
    fn slots(&self) -> Vec<(Verdict, &SingleOutcome)> {
        [
            (Verdict::Fatal, self.fatal.as_ref()),
            (Verdict::Fail, self.fail.as_ref()),
            (Verdict::Warn, self.warn.as_ref()),
            (Verdict::Pass, self.pass.as_ref()),
        ]
        .into_iter()
        .filter_map(|(verdict, slot)| slot.map(|outcome| (verdict, outcome)))
        .collect()
    }
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
        reason = "Test-only panic-based assertions are permitted."
    )]

    use super::*;

    #[test]
    fn verdict_prefers_fatal_over_pass() {
        let outcome = Outcome {
            fatal: Some(SingleOutcome::new("", "fatal")),
            pass: Some(SingleOutcome::new("", "pass")),
            ..Outcome::default()
        };
        let (verdict, single) = outcome.verdict().unwrap();
        assert_eq!(verdict, Verdict::Fatal);
        assert_eq!(single.message, "fatal");
        assert_eq!(outcome.populated(), 2);
    }

    #[test]
    fn empty_outcome_has_no_verdict() {
        assert!(Outcome::default().verdict().is_none());
    }

    #[test]
    fn outcome_decodes_from_manifest_shape() {
        let outcome: Outcome =
            serde_json::from_str(r#"{"warn":{"when":"< 8Gi","message":"low"}}"#).unwrap();
        assert_eq!(outcome, Outcome::warn("< 8Gi", "low"));
    }
}
