// crates/bundle-verdict-core/src/core/condition.rs
// ============================================================================
// Module: Bundle Verdict Conditions
// Description: When-clause tokenization and comparison operators.
// Purpose: Parse `[selector] operator operand` expressions once, uniformly.
// Dependencies: crate::core::error
// ============================================================================

//! ## Overview
//! When-clauses are whitespace-separated. Two tokens read as
//! `operator operand`; three tokens read as `selector operator operand`.
//! Strict spellings (`===`, `!==`) are synonyms for `=` and `!=`, and `<>` is
//! accepted as not-equal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;

use crate::core::error::AnalyzeError;

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Comparison operator in a when-clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// `=`, `==`, `===`.
    Equal,
    /// `!=`, `!==`, `<>`.
    NotEqual,
    /// `<`.
    Less,
    /// `<=`.
    LessOrEqual,
    /// `>`.
    Greater,
    /// `>=`.
    GreaterOrEqual,
}

impl ComparisonOperator {
    /// Parses an operator token.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::ConditionParse`] for unknown operators.
    pub fn parse(token: &str) -> Result<Self, AnalyzeError> {
        match token {
            "=" | "==" | "===" => Ok(Self::Equal),
            "!=" | "!==" | "<>" => Ok(Self::NotEqual),
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessOrEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterOrEqual),
            other => Err(AnalyzeError::ConditionParse(format!("unknown operator '{other}'"))),
        }
    }

    /// Returns true when `ordering` (actual versus expected) satisfies the operator.
    #[must_use]
    pub const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => matches!(ordering, Ordering::Equal),
            Self::NotEqual => !matches!(ordering, Ordering::Equal),
            Self::Less => matches!(ordering, Ordering::Less),
            Self::LessOrEqual => !matches!(ordering, Ordering::Greater),
            Self::Greater => matches!(ordering, Ordering::Greater),
            Self::GreaterOrEqual => !matches!(ordering, Ordering::Less),
        }
    }

    /// Compares `actual` against `expected`.
    #[must_use]
    pub fn compare<T: Ord + ?Sized>(self, actual: &T, expected: &T) -> bool {
        self.holds(actual.cmp(expected))
    }

    /// Returns true for `=` and `!=` spellings.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    /// Canonical spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// Parsed when-clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Field selector for three-token clauses.
    pub selector: Option<String>,
    /// Comparison operator.
    pub operator: ComparisonOperator,
    /// Right-hand operand, unparsed.
    pub operand: String,
}

impl Condition {
    /// Parses a two- or three-token when-clause.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::ConditionParse`] on wrong arity or an unknown operator.
    pub fn parse(text: &str) -> Result<Self, AnalyzeError> {
        let tokens = text.split_whitespace().collect::<Vec<_>>();
        match tokens.as_slice() {
            [operator, operand] => Ok(Self {
                selector: None,
                operator: ComparisonOperator::parse(operator)?,
                operand: (*operand).to_string(),
            }),
            [selector, operator, operand] => Ok(Self {
                selector: Some((*selector).to_string()),
                operator: ComparisonOperator::parse(operator)?,
                operand: (*operand).to_string(),
            }),
            _ => Err(AnalyzeError::ConditionParse(format!(
                "expected 2 or 3 tokens in '{text}', got {}",
                tokens.len()
            ))),
        }
    }

    /// Parses a two-token `operator operand` clause.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::ConditionParse`] when a selector is present.
    pub fn parse_unselected(text: &str) -> Result<Self, AnalyzeError> {
        let condition = Self::parse(text)?;
        if condition.selector.is_some() {
            return Err(AnalyzeError::ConditionParse(format!(
                "expected `operator operand` in '{text}'"
            )));
        }
        Ok(condition)
    }

    /// Parses a three-token `selector operator operand` clause.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::ConditionParse`] when the selector is missing.
    pub fn parse_selected(text: &str) -> Result<(String, ComparisonOperator, String), AnalyzeError> {
        let condition = Self::parse(text)?;
        match condition.selector {
            Some(selector) => Ok((selector, condition.operator, condition.operand)),
            None => Err(AnalyzeError::ConditionParse(format!(
                "expected `selector operator operand` in '{text}'"
            ))),
        }
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
    fn strict_spellings_are_synonyms() {
        assert_eq!(ComparisonOperator::parse("===").unwrap(), ComparisonOperator::Equal);
        assert_eq!(ComparisonOperator::parse("!==").unwrap(), ComparisonOperator::NotEqual);
        assert_eq!(ComparisonOperator::parse("<>").unwrap(), ComparisonOperator::NotEqual);
    }

    #[test]
    fn parse_reads_selector_form() {
        let condition = Condition::parse("succeeded == 1").unwrap();
        assert_eq!(condition.selector.as_deref(), Some("succeeded"));
        assert_eq!(condition.operator, ComparisonOperator::Equal);
        assert_eq!(condition.operand, "1");
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        assert!(matches!(Condition::parse("<"), Err(AnalyzeError::ConditionParse(_))));
        assert!(matches!(Condition::parse("a b c d"), Err(AnalyzeError::ConditionParse(_))));
        assert!(matches!(Condition::parse(""), Err(AnalyzeError::ConditionParse(_))));
    }

    #[test]
    fn parse_rejects_unknown_operator() {
        assert!(matches!(Condition::parse("~= 4"), Err(AnalyzeError::ConditionParse(_))));
    }

    #[test]
    fn holds_matches_ordering() {
        assert!(ComparisonOperator::LessOrEqual.compare(&3, &3));
        assert!(!ComparisonOperator::Less.compare(&3, &3));
        assert!(ComparisonOperator::NotEqual.compare("a", "b"));
    }
}
