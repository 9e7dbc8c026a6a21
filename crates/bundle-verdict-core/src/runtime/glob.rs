// crates/bundle-verdict-core/src/runtime/glob.rs
// ============================================================================
// Module: Bundle Verdict Path Globs
// Description: Glob patterns over bundle-relative paths.
// Purpose: Share one glob dialect between evidence store implementations.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! `*` matches within one path segment, `**` matches across segments, and
//! `?` matches one non-separator character. Everything else is literal.
//! Patterns compile to an anchored regular expression.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Glob Pattern
// ============================================================================

/// Compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    /// Source pattern.
    pattern: String,
    /// Anchored matcher.
    regex: Regex,
}

impl GlobPattern {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the pattern is empty or cannot compile.
    pub fn new(pattern: &str) -> Result<Self, StoreError> {
        if pattern.trim().is_empty() {
            return Err(StoreError::Invalid("glob pattern must be non-empty".to_string()));
        }
        let mut source = String::from("^");
        let mut chars = pattern.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '*' if chars.peek() == Some(&'*') => {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        source.push_str("(?:.*/)?");
                    } else {
                        source.push_str(".*");
                    }
                }
                '*' => source.push_str("[^/]*"),
                '?' => source.push_str("[^/]"),
                other => source.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
            }
        }
        source.push('$');
        let regex = Regex::new(&source)
            .map_err(|err| StoreError::Invalid(format!("invalid glob '{pattern}': {err}")))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns true when `path` matches.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Longest directory prefix without wildcards, for walk pruning.
    #[must_use]
    pub fn literal_prefix(&self) -> &str {
        let wildcard = self.pattern.find(['*', '?']).unwrap_or(self.pattern.len());
        let literal = &self.pattern[..wildcard];
        literal.rfind('/').map_or("", |slash| &literal[..slash])
    }
}

/// Compiled include pattern plus exclusions.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    /// Include pattern.
    include: GlobPattern,
    /// Exclusion patterns.
    exclude: Vec<GlobPattern>,
}

impl GlobFilter {
    /// Compiles an include pattern and its exclusions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when any pattern is invalid.
    pub fn new(pattern: &str, exclude: &[String]) -> Result<Self, StoreError> {
        Ok(Self {
            include: GlobPattern::new(pattern)?,
            exclude: exclude.iter().map(|item| GlobPattern::new(item)).collect::<Result<_, _>>()?,
        })
    }

    /// Returns true when `path` is included and not excluded.
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.iter().any(|glob| glob.is_match(path))
    }

    /// Include pattern.
    #[must_use]
    pub const fn include(&self) -> &GlobPattern {
        &self.include
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
