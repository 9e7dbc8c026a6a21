// crates/bundle-verdict-core/src/runtime/aggregator.rs
// ============================================================================
// Module: Bundle Verdict Result Aggregator
// Description: Collects per-unit resolutions into one analyzer output.
// Purpose: Concatenate matched results for fan-out analyzers.
// Dependencies: crate::{core, runtime::resolver}
// ============================================================================

//! ## Overview
//! Fan-out analyzers resolve their outcome list once per unit (node,
//! namespace, object). Matched units are kept in unit order; exhausted units
//! are discarded. Units that came from a remote node carry a
//! `"<title> - Node <name>"` title.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AnalyzeResult;
use crate::core::AnalyzeWarning;
use crate::core::AnalyzerOutput;
use crate::core::CollectedContent;
use crate::runtime::resolver::Resolution;

// ============================================================================
// SECTION: Aggregator
// ============================================================================

/// Title for a unit resolved from `content`.
#[must_use]
pub fn node_title(title: &str, content: &CollectedContent) -> String {
    if content.is_local() {
        title.to_string()
    } else {
        format!("{title} - Node {}", content.node_name)
    }
}

/// Accumulates per-unit resolutions.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    /// Collected output.
    output: AnalyzerOutput,
}

impl ResultAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit's resolution; exhausted units are dropped.
    pub fn push(&mut self, resolution: Resolution) {
        if let Some(result) = resolution.matched() {
            self.output.results.push(result);
        }
    }

    /// Adds a result produced outside the resolver.
    pub fn push_result(&mut self, result: AnalyzeResult) {
        self.output.results.push(result);
    }

    /// Warning sink for resolvers.
    pub const fn warnings(&mut self) -> &mut Vec<AnalyzeWarning> {
        &mut self.output.warnings
    }

    /// Number of collected results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.output.results.len()
    }

    /// Returns true when no unit matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.results.is_empty()
    }

    /// Finishes aggregation, stamping the strict flag on every result.
    #[must_use]
    pub fn finish(mut self, strict: bool) -> AnalyzerOutput {
        self.output.stamp_strict(strict);
        self.output
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
