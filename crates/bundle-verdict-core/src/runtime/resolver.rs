// crates/bundle-verdict-core/src/runtime/resolver.rs
// ============================================================================
// Module: Bundle Verdict Outcome Resolver
// Description: First-match-wins evaluation of ordered outcome lists.
// Purpose: Turn an outcome list plus a condition predicate into one verdict.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Outcomes are evaluated in declaration order and the first satisfied one
//! wins, even if a later one would also match. An outcome with an empty
//! when-clause is an unconditional match unless the analyzer asks to see
//! empty clauses itself. An outcome with no populated slot is skipped with a
//! warning. A predicate error aborts this outcome list only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AnalyzeError;
use crate::core::AnalyzeResult;
use crate::core::AnalyzeWarning;
use crate::core::Outcome;
use crate::core::SingleOutcome;
use crate::core::Verdict;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How an empty when-clause is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWhen {
    /// Empty clauses match unconditionally.
    #[default]
    Unconditional,
    /// Empty clauses are passed to the predicate, which supplies a default.
    Evaluate,
}

/// Terminal state of an outcome list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An outcome matched.
    Matched(AnalyzeResult),
    /// No outcome matched.
    Exhausted {
        /// Title the result would have carried.
        title: String,
    },
}

impl Resolution {
    /// Returns the matched result.
    #[must_use]
    pub fn matched(self) -> Option<AnalyzeResult> {
        match self {
            Self::Matched(result) => Some(result),
            Self::Exhausted {
                ..
            } => None,
        }
    }

    /// Returns the matched result or a neutral result carrying the title.
    #[must_use]
    pub fn into_result(self) -> AnalyzeResult {
        match self {
            Self::Matched(result) => result,
            Self::Exhausted {
                title,
            } => AnalyzeResult::neutral(title),
        }
    }
}

/// Ordered outcome list bound to one result title.
pub struct OutcomeResolver<'a> {
    /// Result title.
    title: &'a str,
    /// Outcomes in declaration order.
    outcomes: &'a [Outcome],
    /// Empty when-clause policy.
    empty_when: EmptyWhen,
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

impl<'a> OutcomeResolver<'a> {
    /// Creates a resolver with unconditional empty clauses.
    #[must_use]
    pub const fn new(title: &'a str, outcomes: &'a [Outcome]) -> Self {
        Self {
            title,
            outcomes,
            empty_when: EmptyWhen::Unconditional,
        }
    }

    /// Overrides the empty when-clause policy.
    #[must_use]
    pub const fn with_empty_when(mut self, empty_when: EmptyWhen) -> Self {
        self.empty_when = empty_when;
        self
    }

    /// Resolves the list with `check(verdict, when)` as the predicate.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `check`.
    pub fn resolve<F>(
        &self,
        warnings: &mut Vec<AnalyzeWarning>,
        mut check: F,
    ) -> Result<Resolution, AnalyzeError>
    where
        F: FnMut(Verdict, &str) -> Result<bool, AnalyzeError>,
    {
        for (index, outcome) in self.outcomes.iter().enumerate() {
            let Some((verdict, single)) = self.candidate(index, outcome, warnings) else {
                continue;
            };
            let when = single.when.trim();
            let matched = if when.is_empty() && self.empty_when == EmptyWhen::Unconditional {
                true
            } else {
                check(verdict, when)?
            };
            if matched {
                return Ok(Resolution::Matched(AnalyzeResult::matched(self.title, verdict, single)));
            }
        }
        Ok(Resolution::Exhausted {
            title: self.title.to_string(),
        })
    }

    /// Selects the slot to evaluate, warning on malformed outcomes.
    fn candidate<'o>(
        &self,
        index: usize,
        outcome: &'o Outcome,
        warnings: &mut Vec<AnalyzeWarning>,
    ) -> Option<(Verdict, &'o SingleOutcome)> {
        let candidate = outcome.verdict();
        match (candidate, outcome.populated()) {
            (None, _) => warnings.push(AnalyzeWarning::new(
                self.title,
                format!("outcome {index} has no verdict populated; skipped"),
            )),
            (Some((verdict, _)), count) if count > 1 => warnings.push(AnalyzeWarning::new(
                self.title,
                format!("outcome {index} populates {count} verdicts; using {verdict}"),
            )),
            _ => {}
        }
        candidate
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
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn first_satisfied_outcome_wins() {
        let outcomes = vec![Outcome::warn("a", "specific"), Outcome::pass("b", "general")];
        let mut warnings = Vec::new();
        let resolution =
            OutcomeResolver::new("T", &outcomes).resolve(&mut warnings, |_, _| Ok(true)).unwrap();
        let result = resolution.matched().unwrap();
        assert!(result.is_warn());
        assert_eq!(result.message, "specific");
        assert_eq!(result.title, "T");
    }

    #[test]
    fn empty_when_is_unconditional() {
        let outcomes = vec![Outcome::pass("x", "never"), Outcome::fail("", "default")];
        let mut warnings = Vec::new();
        let result = OutcomeResolver::new("T", &outcomes)
            .resolve(&mut warnings, |_, when| {
                assert_eq!(when, "x");
                Ok(false)
            })
            .unwrap()
            .matched()
            .unwrap();
        assert!(result.is_fail());
        assert_eq!(result.message, "default");
    }

    #[test]
    fn evaluate_policy_passes_empty_when_to_predicate() {
        let outcomes = vec![Outcome::pass("", "equal")];
        let mut warnings = Vec::new();
        let mut seen = Vec::new();
        let resolution = OutcomeResolver::new("T", &outcomes)
            .with_empty_when(EmptyWhen::Evaluate)
            .resolve(&mut warnings, |verdict, when| {
                seen.push((verdict, when.to_string()));
                Ok(false)
            })
            .unwrap();
        assert_eq!(seen, vec![(Verdict::Pass, String::new())]);
        assert_eq!(
            resolution,
            Resolution::Exhausted {
                title: "T".to_string()
            }
        );
    }

    #[test]
    fn exhausted_list_yields_neutral_result() {
        let outcomes = vec![Outcome::pass("x", "p")];
        let mut warnings = Vec::new();
        let resolution =
            OutcomeResolver::new("T", &outcomes).resolve(&mut warnings, |_, _| Ok(false)).unwrap();
        let neutral = resolution.into_result();
        assert_eq!(neutral.title, "T");
        assert!(neutral.verdict.is_none());
    }

    #[test]
    fn empty_outcome_is_skipped_with_warning() {
        let outcomes = vec![Outcome::default(), Outcome::pass("", "ok")];
        let mut warnings = Vec::new();
        let result = OutcomeResolver::new("T", &outcomes)
            .resolve(&mut warnings, |_, _| Ok(false))
            .unwrap()
            .matched()
            .unwrap();
        assert!(result.is_pass());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("no verdict"));
    }

    #[test]
    fn predicate_error_aborts_resolution() {
        let outcomes = vec![Outcome::fail("bad", "x"), Outcome::pass("", "ok")];
        let mut warnings = Vec::new();
        let err = OutcomeResolver::new("T", &outcomes)
            .resolve(&mut warnings, |_, when| {
                Err(AnalyzeError::ConditionParse(when.to_string()))
            })
            .unwrap_err();
        assert_eq!(err, AnalyzeError::ConditionParse("bad".to_string()));
    }
}
