// crates/bundle-verdict-core/src/runtime/conditions/boolean.rs
// ============================================================================
// Module: Boolean Conditions
// Description: `true` / `false` when-clauses.
// Purpose: Evaluate existence and equality flags.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Boolean clauses compare a literal against an actual flag such as "a
//! matching event exists" or "the documents are equal".

use crate::core::AnalyzeError;
use crate::core::meta::parse_bool_literal;

/// Parses a boolean when-clause.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when `when` is not bool-like.
pub fn parse_when_bool(when: &str) -> Result<bool, AnalyzeError> {
    parse_bool_literal(when.trim())
        .ok_or_else(|| AnalyzeError::ConditionParse(format!("'{when}' is not a boolean condition")))
}

/// Returns true when the clause literal equals `actual`.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when `when` is not bool-like.
pub fn evaluate_boolean(when: &str, actual: bool) -> Result<bool, AnalyzeError> {
    Ok(parse_when_bool(when)? == actual)
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
    fn literal_matches_actual() {
        assert!(evaluate_boolean("true", true).unwrap());
        assert!(evaluate_boolean("False", false).unwrap());
        assert!(!evaluate_boolean("1", false).unwrap());
    }

    #[test]
    fn non_boolean_is_a_parse_error() {
        assert!(matches!(evaluate_boolean("yes", true), Err(AnalyzeError::ConditionParse(_))));
    }
}
