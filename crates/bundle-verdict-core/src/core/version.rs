// crates/bundle-verdict-core/src/core/version.rs
// ============================================================================
// Module: Bundle Verdict Dotted Versions
// Description: Tolerant `major.minor.patch` versions for kernel and OS checks.
// Purpose: Compare versions component-wise, not lexicographically.
// Dependencies: crate::core::error
// ============================================================================

//! ## Overview
//! Only the leading numeric prefix of up to three components is kept, so
//! `5.4.0-1034-gcp` reads as `5.4.0` and `16.04` reads as `16.4.0`. Missing
//! components are zero. A fourth component is dropped: `3.10.0.957` and
//! `3.10.0.1160` both read as `3.10.0` and compare equal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::core::error::AnalyzeError;

// ============================================================================
// SECTION: Dotted Version
// ============================================================================

/// Three-component numeric version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DottedVersion {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

impl DottedVersion {
    /// Creates a version from components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses the leading numeric prefix of a version string.
    ///
    /// Components past the third are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::ConditionParse`] when no leading number exists.
    pub fn parse(text: &str) -> Result<Self, AnalyzeError> {
        let trimmed = text.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let mut components = [0u64; 3];
        let mut parsed = 0;
        for (index, part) in trimmed.split('.').take(3).enumerate() {
            let digits_end = part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len());
            let digits = &part[..digits_end];
            if digits.is_empty() {
                break;
            }
            components[index] = digits.parse().map_err(|_| {
                AnalyzeError::ConditionParse(format!("version component out of range in '{text}'"))
            })?;
            parsed += 1;
            if digits_end < part.len() {
                break;
            }
        }
        if parsed == 0 {
            return Err(AnalyzeError::ConditionParse(format!("invalid version '{text}'")));
        }
        Ok(Self::new(components[0], components[1], components[2]))
    }
}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
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
    fn strips_build_metadata() {
        assert_eq!(DottedVersion::parse("5.4.0-1034-gcp").unwrap(), DottedVersion::new(5, 4, 0));
        assert_eq!(DottedVersion::parse("4.18.0+el8").unwrap(), DottedVersion::new(4, 18, 0));
    }

    #[test]
    fn leading_zeros_and_short_forms() {
        assert_eq!(DottedVersion::parse("16.04").unwrap(), DottedVersion::new(16, 4, 0));
        assert_eq!(DottedVersion::parse("7").unwrap(), DottedVersion::new(7, 0, 0));
    }

    #[test]
    fn fourth_component_is_ignored() {
        let rhel = DottedVersion::parse("3.10.0.957").unwrap();
        assert_eq!(rhel, DottedVersion::new(3, 10, 0));
        assert_eq!(rhel, DottedVersion::parse("3.10.0.1160").unwrap());
        assert_eq!(DottedVersion::parse("1.2.3.4.5").unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn compares_numerically() {
        let older = DottedVersion::parse("4.9").unwrap();
        let newer = DottedVersion::parse("4.15").unwrap();
        assert!(older < newer);
        assert!(DottedVersion::parse("4.15").unwrap() < DottedVersion::parse("4.16.0").unwrap());
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(DottedVersion::parse("latest").is_err());
        assert!(DottedVersion::parse("").is_err());
    }
}
