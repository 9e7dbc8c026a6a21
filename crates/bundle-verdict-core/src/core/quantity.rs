// crates/bundle-verdict-core/src/core/quantity.rs
// ============================================================================
// Module: Bundle Verdict Quantities
// Description: Byte quantities with binary and decimal unit suffixes.
// Purpose: Normalize `8Gi`, `16G`, `1.5Ki` and raw counts to whole bytes.
// Dependencies: crate::core::error
// ============================================================================

//! ## Overview
//! A quantity is a decimal number with an optional suffix. Binary suffixes
//! (`Ki` through `Ei`) scale by powers of 1024; decimal suffixes (`k`/`K`
//! through `E`) scale by powers of 1000. The scaled value must be a whole
//! number of bytes that fits in `u64`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::error::AnalyzeError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest fraction accepted before scaling.
const MAX_FRACTION_DIGITS: usize = 18;

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a quantity into whole bytes.
///
/// # Errors
///
/// Returns [`AnalyzeError::ConditionParse`] when the number or suffix is
/// invalid, the value is fractional after scaling, or it overflows `u64`.
pub fn parse_quantity(text: &str) -> Result<u64, AnalyzeError> {
    let text = text.trim();
    let split = text.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);
    let multiplier = suffix_multiplier(suffix)
        .ok_or_else(|| invalid(text, &format!("unknown unit suffix '{suffix}'")))?;

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid(text, "missing number"));
    }
    if fraction.contains('.') || fraction.len() > MAX_FRACTION_DIGITS {
        return Err(invalid(text, "malformed fraction"));
    }

    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| invalid(text, "number out of range"))?
    };
    let mut bytes = whole_value.checked_mul(multiplier).ok_or_else(|| invalid(text, "overflow"))?;

    if !fraction.is_empty() {
        let numerator = fraction.parse::<u128>().map_err(|_| invalid(text, "malformed fraction"))?;
        let exponent = u32::try_from(fraction.len()).map_err(|_| invalid(text, "malformed fraction"))?;
        let denominator = 10u128.pow(exponent);
        let scaled = numerator.checked_mul(multiplier).ok_or_else(|| invalid(text, "overflow"))?;
        if scaled % denominator != 0 {
            return Err(invalid(text, "quantity is not a whole number of bytes"));
        }
        bytes = bytes.checked_add(scaled / denominator).ok_or_else(|| invalid(text, "overflow"))?;
    }

    u64::try_from(bytes).map_err(|_| invalid(text, "quantity exceeds 64 bits"))
}

/// Multiplier for a unit suffix.
fn suffix_multiplier(suffix: &str) -> Option<u128> {
    let (base, power) = match suffix {
        "" => return Some(1),
        "Ki" => (1024, 1),
        "Mi" => (1024, 2),
        "Gi" => (1024, 3),
        "Ti" => (1024, 4),
        "Pi" => (1024, 5),
        "Ei" => (1024, 6),
        "k" | "K" => (1000, 1),
        "M" => (1000, 2),
        "G" => (1000, 3),
        "T" => (1000, 4),
        "P" => (1000, 5),
        "E" => (1000, 6),
        _ => return None,
    };
    Some(u128::pow(base, power))
}

/// Builds a parse error for a quantity.
fn invalid(text: &str, reason: &str) -> AnalyzeError {
    AnalyzeError::ConditionParse(format!("invalid quantity '{text}': {reason}"))
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
    fn binary_and_decimal_suffixes_scale() {
        assert_eq!(parse_quantity("8Gi").unwrap(), 8 * 1024 * 1024 * 1024);
        assert_eq!(parse_quantity("8G").unwrap(), 8_000_000_000);
        assert_eq!(parse_quantity("2k").unwrap(), 2000);
        assert_eq!(parse_quantity("1024").unwrap(), 1024);
    }

    #[test]
    fn fractions_must_land_on_whole_bytes() {
        assert_eq!(parse_quantity("1.5Ki").unwrap(), 1536);
        assert_eq!(parse_quantity("0.5G").unwrap(), 500_000_000);
        assert!(parse_quantity("1.5").is_err());
    }

    #[test]
    fn rejects_unknown_units_and_garbage() {
        assert!(parse_quantity("8Gb").is_err());
        assert!(parse_quantity("Gi").is_err());
        assert!(parse_quantity("1.2.3").is_err());
        assert!(parse_quantity("-1").is_err());
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_quantity("100Ei").is_err());
    }
}
