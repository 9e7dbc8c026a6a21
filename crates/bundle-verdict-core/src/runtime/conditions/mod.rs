// crates/bundle-verdict-core/src/runtime/conditions/mod.rs
// ============================================================================
// Module: Bundle Verdict Condition Evaluators
// Description: One evaluator per evidence shape.
// Purpose: Turn `(when-clause, actual evidence)` into a boolean.
// Dependencies: crate::core, regex, serde_json, serde_yaml, jsonpath_lib
// ============================================================================

//! ## Overview
//! Every evaluator either returns a boolean or a
//! [`crate::core::AnalyzeError::ConditionParse`]. Malformed clauses are never
//! silently treated as a non-match; the only lenient path is the event message
//! regex, whose compile failure is reported as a warning and means "no event".

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod boolean;
pub mod event;
pub mod numeric;
pub mod platform;
pub mod quantity;
pub mod structural;
pub mod token;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use boolean::evaluate_boolean;
pub use boolean::parse_when_bool;
pub use event::EventFilter;
pub use event::find_matching_event;
pub use numeric::evaluate_integer;
pub use platform::evaluate_platform;
pub use quantity::evaluate_quantity;
pub use structural::equal_ignoring_order;
pub use structural::select_json_path;
pub use structural::select_path;
pub use structural::values_equal;
pub use token::evaluate_exact;
pub use token::evaluate_token;
pub use token::tokens_equal;
pub use version::evaluate_version;
