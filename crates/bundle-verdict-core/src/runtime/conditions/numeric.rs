// crates/bundle-verdict-core/src/runtime/conditions/numeric.rs
// ============================================================================
// Module: Integer Conditions
// Description: Integer comparisons for replica, job and sysctl counts.
// Purpose: Parse integer operands once with consistent errors.
// Dependencies: crate::core
// ============================================================================

//! Integer comparisons for replica, job and sysctl counts.

use crate::core::AnalyzeError;
use crate::core::ComparisonOperator;

/// Parses an integer operand.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when `operand` is not an integer.
pub fn parse_integer(operand: &str) -> Result<i64, AnalyzeError> {
    operand
        .trim()
        .parse()
        .map_err(|_| AnalyzeError::ConditionParse(format!("'{operand}' is not an integer")))
}

/// Compares an integer against an integer operand.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when `operand` is not an integer.
pub fn evaluate_integer(
    operator: ComparisonOperator,
    operand: &str,
    actual: i64,
) -> Result<bool, AnalyzeError> {
    Ok(operator.compare(&actual, &parse_integer(operand)?))
}

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
    fn compares_integers() {
        assert!(evaluate_integer(ComparisonOperator::GreaterOrEqual, "2", 3).unwrap());
        assert!(!evaluate_integer(ComparisonOperator::Equal, "-1", 1).unwrap());
        assert!(evaluate_integer(ComparisonOperator::Less, "x", 1).is_err());
    }
}
