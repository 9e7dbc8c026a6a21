// crates/bundle-verdict-core/src/runtime/conditions/token.rs
// ============================================================================
// Module: Token Conditions
// Description: Equality over status tokens and literal strings.
// Purpose: Compare pod phases, runtimes and service states.
// Dependencies: crate::core
// ============================================================================

//! Equality over status tokens and literal strings.

use crate::core::AnalyzeError;
use crate::core::ComparisonOperator;

/// Returns true when two tokens are equal ignoring ASCII case.
#[must_use]
pub fn tokens_equal(actual: &str, expected: &str) -> bool {
    actual.eq_ignore_ascii_case(expected)
}

/// Applies an equality operator to two tokens.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] for ordering operators.
pub fn evaluate_token(
    operator: ComparisonOperator,
    actual: &str,
    expected: &str,
) -> Result<bool, AnalyzeError> {
    match operator {
        ComparisonOperator::Equal => Ok(tokens_equal(actual, expected)),
        ComparisonOperator::NotEqual => Ok(!tokens_equal(actual, expected)),
        other => Err(AnalyzeError::ConditionParse(format!(
            "operator {other} is not supported for '{expected}'"
        ))),
    }
}

/// Applies an equality operator to two strings, respecting case.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] for ordering operators.
pub fn evaluate_exact(
    operator: ComparisonOperator,
    actual: &str,
    expected: &str,
) -> Result<bool, AnalyzeError> {
    match operator {
        ComparisonOperator::Equal => Ok(actual == expected),
        ComparisonOperator::NotEqual => Ok(actual != expected),
        other => Err(AnalyzeError::ConditionParse(format!(
            "operator {other} is not supported for '{expected}'"
        ))),
    }
}
