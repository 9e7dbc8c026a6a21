// crates/bundle-verdict-core/src/runtime/conditions/version.rs
// ============================================================================
// Module: Version Conditions
// Description: `<op> <version>` clauses over dotted versions.
// Purpose: Compare kernel and platform versions component-wise.
// Dependencies: crate::core
// ============================================================================

//! `<op> <version>` clauses over dotted versions.

use crate::core::AnalyzeError;
use crate::core::ComparisonOperator;
use crate::core::Condition;
use crate::core::DottedVersion;

/// Evaluates `<op> <version>` against an actual version string.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when the clause or either version
/// is malformed.
pub fn evaluate_version(when: &str, actual: &str) -> Result<bool, AnalyzeError> {
    let condition = Condition::parse_unselected(when)?;
    compare_versions(condition.operator, actual, &condition.operand)
}

/// Compares two version strings.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when either version is malformed.
pub fn compare_versions(
    operator: ComparisonOperator,
    actual: &str,
    expected: &str,
) -> Result<bool, AnalyzeError> {
    let actual = DottedVersion::parse(actual)?;
    let expected = DottedVersion::parse(expected)?;
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

    #[test]
    fn numeric_not_lexicographic() {
        assert!(evaluate_version("< 4.15", "4.9").unwrap());
        assert!(evaluate_version(">= 4.15", "5.4.0-1034-gcp").unwrap());
        assert!(!evaluate_version(">= 4.16.0", "4.15").unwrap());
    }

    #[test]
    fn malformed_versions_fail() {
        assert!(evaluate_version(">= latest", "4.15").is_err());
    }
}
