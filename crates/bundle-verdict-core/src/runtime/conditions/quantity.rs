// crates/bundle-verdict-core/src/runtime/conditions/quantity.rs
// ============================================================================
// Module: Quantity Conditions
// Description: `<op> <number><unit>` clauses over byte counts.
// Purpose: Compare memory and disk sizes across unit systems.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The operand is normalized to whole bytes before comparison, so `8Gi` and
//! `8589934592` are the same value.

use crate::core::AnalyzeError;
use crate::core::ComparisonOperator;
use crate::core::Condition;
use crate::core::parse_quantity;

/// Evaluates `<op> <quantity>` against a byte count.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] for malformed clauses or quantities.
pub fn evaluate_quantity(when: &str, actual: u64) -> Result<bool, AnalyzeError> {
    let condition = Condition::parse_unselected(when)?;
    compare_quantity(condition.operator, &condition.operand, actual)
}

/// Compares a byte count against a quantity operand.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when the operand is not a quantity.
pub fn compare_quantity(
    operator: ComparisonOperator,
    operand: &str,
    actual: u64,
) -> Result<bool, AnalyzeError> {
    let expected = parse_quantity(operand)?;
    Ok(operator.compare(&actual, &expected))
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

    const EIGHT_GI: u64 = 8 * 1024 * 1024 * 1024;

    #[test]
    fn eight_gibibytes_boundary() {
        assert!(evaluate_quantity("<= 8Gi", EIGHT_GI).unwrap());
        assert!(!evaluate_quantity("< 8Gi", EIGHT_GI).unwrap());
        assert!(evaluate_quantity("== 8589934592", EIGHT_GI).unwrap());
        assert!(evaluate_quantity("> 8G", EIGHT_GI).unwrap());
    }

    #[test]
    fn malformed_clause_is_an_error() {
        assert!(evaluate_quantity("8Gi", EIGHT_GI).is_err());
        assert!(evaluate_quantity("< lots", EIGHT_GI).is_err());
        assert!(evaluate_quantity("total < 8Gi", EIGHT_GI).is_err());
    }
}
