// crates/bundle-verdict-core/src/runtime/conditions/platform.rs
// ============================================================================
// Module: Platform Conditions
// Description: `<selector> <op> <version>` clauses over host OS facts.
// Purpose: Gate on kernel or distribution versions per platform.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Selectors:
//! - `kernelVersion` compares the kernel on any platform.
//! - `<platform>-<platformVersion>-kernel` compares the kernel when both the
//!   platform and its version match exactly.
//! - `<platform>-kernel` compares the kernel when the platform matches.
//! - `<platform>` compares the distribution version.
//!
//! Any other selector evaluates to false. The operand is parsed before the
//! selector is dispatched, so a malformed operand always fails.

use crate::core::AnalyzeError;
use crate::core::ComparisonOperator;
use crate::core::Condition;
use crate::core::DottedVersion;
use crate::core::HostOsInfo;

/// Selector that compares the kernel version on any platform.
const KERNEL_SELECTOR: &str = "kernelVersion";
/// Suffix of platform-scoped kernel selectors.
const KERNEL_SUFFIX: &str = "-kernel";

/// Evaluates a platform clause against host OS facts.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] for malformed clauses and for a
/// selected version that cannot be parsed.
pub fn evaluate_platform(when: &str, info: &HostOsInfo) -> Result<bool, AnalyzeError> {
    let (selector, operator, operand) = Condition::parse_selected(when)?;
    let expected = DottedVersion::parse(&operand)?;

    if selector == KERNEL_SELECTOR {
        return holds(operator, &info.kernel_version, expected);
    }

    if let Some(scope) = selector.strip_suffix(KERNEL_SUFFIX) {
        let versioned = format!("{}-{}", info.platform, info.platform_version);
        if scope == versioned || scope == info.platform {
            return holds(operator, &info.kernel_version, expected);
        }
        return Ok(false);
    }

    if selector == info.platform {
        return holds(operator, &info.platform_version, expected);
    }
    Ok(false)
}

/// Compares an actual version string against a parsed operand.
fn holds(
    operator: ComparisonOperator,
    actual: &str,
    expected: DottedVersion,
) -> Result<bool, AnalyzeError> {
    let actual = DottedVersion::parse(actual)?;
    Ok(operator.compare(&actual, &expected))
}
