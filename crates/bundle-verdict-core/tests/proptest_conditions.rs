// crates/bundle-verdict-core/tests/proptest_conditions.rs
// ============================================================================
// Module: Condition Property-Based Tests
// Description: Property tests for quantity and version comparisons.
// Purpose: Check unit scaling and numeric version ordering over wide ranges.
// ============================================================================

//! Property-based tests for condition evaluator invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use bundle_verdict_core::parse_quantity;
use bundle_verdict_core::runtime::conditions::evaluate_quantity;
use bundle_verdict_core::runtime::conditions::evaluate_version;
use proptest::prelude::*;

const BINARY_SUFFIXES: [&str; 4] = ["Ki", "Mi", "Gi", "Ti"];
const DECIMAL_SUFFIXES: [&str; 4] = ["k", "M", "G", "T"];

proptest! {
    #[test]
    fn binary_quantities_order_like_bytes(
        actual in any::<u64>(),
        count in 0u64 .. 1_000_000,
        unit in 0usize .. 4,
    ) {
        let bytes = count * 1024u64.pow(u32::try_from(unit + 1).unwrap());
        let when = format!("< {count}{}", BINARY_SUFFIXES[unit]);
        prop_assert_eq!(evaluate_quantity(&when, actual).unwrap(), actual < bytes);
    }

    #[test]
    fn decimal_quantities_order_like_bytes(
        actual in any::<u64>(),
        count in 0u64 .. 1_000_000,
        unit in 0usize .. 4,
    ) {
        let bytes = count * 1000u64.pow(u32::try_from(unit + 1).unwrap());
        let when = format!(">= {count}{}", DECIMAL_SUFFIXES[unit]);
        prop_assert_eq!(evaluate_quantity(&when, actual).unwrap(), actual >= bytes);
    }

    #[test]
    fn equal_magnitudes_agree_across_units(actual in any::<u64>(), count in 0u64 .. 1_000_000) {
        let larger = format!("<= {count}Mi");
        let smaller = format!("<= {}Ki", count * 1024);
        let plain = format!("<= {}", count * 1024 * 1024);
        let expected = evaluate_quantity(&plain, actual).unwrap();
        prop_assert_eq!(evaluate_quantity(&larger, actual).unwrap(), expected);
        prop_assert_eq!(evaluate_quantity(&smaller, actual).unwrap(), expected);
        prop_assert_eq!(parse_quantity(&format!("{count}M")).unwrap(), count * 1_000_000);
    }

    #[test]
    fn versions_order_component_wise(
        actual in (0u16 .. 40, 0u16 .. 40, 0u16 .. 40),
        expected in (0u16 .. 40, 0u16 .. 40, 0u16 .. 40),
    ) {
        let actual_text = format!("{}.{}.{}", actual.0, actual.1, actual.2);
        let expected_text = format!("{}.{}.{}", expected.0, expected.1, expected.2);
        let when = format!(">= {expected_text}");
        prop_assert_eq!(evaluate_version(&when, &actual_text).unwrap(), actual >= expected);
        let when = format!("< {expected_text}");
        prop_assert_eq!(evaluate_version(&when, &actual_text).unwrap(), actual < expected);
    }

    #[test]
    fn version_suffixes_and_padding_are_ignored(major in 0u16 .. 100, minor in 0u16 .. 100) {
        let kernel = format!("{major}.{minor}.0-1034-gcp");
        let when = format!("== {major}.{minor}");
        prop_assert!(evaluate_version(&when, &kernel).unwrap());
    }
}

#[test]
fn minor_versions_compare_numerically() {
    assert!(evaluate_version("< 4.15", "4.9").unwrap());
    assert!(evaluate_version("< 4.16.0", "4.15").unwrap());
    assert!(!evaluate_version(">= 4.16", "4.15.9").unwrap());
}

#[test]
fn gibibyte_boundary() {
    let actual = 8 * 1024 * 1024 * 1024;
    assert!(evaluate_quantity("<= 8Gi", actual).unwrap());
    assert!(!evaluate_quantity("< 8Gi", actual).unwrap());
}
