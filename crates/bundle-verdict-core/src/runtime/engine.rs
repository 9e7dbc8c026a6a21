// crates/bundle-verdict-core/src/runtime/engine.rs
// ============================================================================
// Module: Bundle Verdict Analysis Engine
// Description: Sequential driver over a list of analyzers.
// Purpose: Run analyzers against one bundle and collect an ordered report.
// Dependencies: crate::{core, interfaces, runtime}, serde, serde_json
// ============================================================================

//! ## Overview
//! The engine is the single path from a manifest to a report. Analyzers run
//! in manifest order against one [`EvidenceStore`]; an analyzer error is
//! recorded as an [`AnalyzerFailure`] and the run continues. Exclusions,
//! failures, empty analyzers and resolution warnings are forwarded to the
//! [`AnalysisLogSink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::AnalyzeError;
use crate::core::AnalyzeResult;
use crate::core::AnalyzeWarning;
use crate::interfaces::AnalysisLogEvent;
use crate::interfaces::AnalysisLogSink;
use crate::interfaces::EvidenceStore;
use crate::runtime::analyzers::Analyzer;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the analysis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisEngineConfig {
    /// Skip analyzers whose canonical encoding was already seen.
    pub dedup_analyzers: bool,
}

impl Default for AnalysisEngineConfig {
    fn default() -> Self {
        Self {
            dedup_analyzers: true,
        }
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Analyzer that could not produce a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerFailure {
    /// Analyzer title.
    pub title: String,
    /// Error raised by the analyzer.
    #[serde(serialize_with = "serialize_error")]
    pub error: AnalyzeError,
}

/// Serializes an error as its display text.
fn serialize_error<S: serde::Serializer>(
    error: &AnalyzeError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Results in analyzer order.
    pub results: Vec<AnalyzeResult>,
    /// Analyzers that errored, in analyzer order.
    pub failures: Vec<AnalyzerFailure>,
    /// Resolution warnings in analyzer order.
    pub warnings: Vec<AnalyzeWarning>,
}

impl AnalysisReport {
    /// Returns true when any result is Fail or Fatal.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|result| result.is_fail() || result.is_fatal())
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Analysis engine bound to one bundle.
pub struct AnalysisEngine<S, L> {
    /// Evidence of the bundle under analysis.
    store: S,
    /// Log sink for analysis events.
    sink: L,
    /// Engine configuration.
    config: AnalysisEngineConfig,
}

impl<S, L> AnalysisEngine<S, L>
where
    S: EvidenceStore,
    L: AnalysisLogSink,
{
    /// Creates a new engine.
    #[must_use]
    pub const fn new(store: S, sink: L, config: AnalysisEngineConfig) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Evidence store the engine reads from.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Runs every analyzer in order.
    #[must_use]
    pub fn run(&self, analyzers: &[Analyzer]) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        let mut seen = BTreeSet::new();
        for analyzer in analyzers {
            if self.config.dedup_analyzers
                && let Ok(key) = serde_json::to_string(analyzer)
                && !seen.insert(key)
            {
                continue;
            }
            self.run_one(analyzer, &mut report);
        }
        report
    }

    /// Runs one analyzer and folds its output into the report.
    fn run_one(&self, analyzer: &Analyzer, report: &mut AnalysisReport) {
        let title = analyzer.title();
        let outcome = analyzer.is_excluded().and_then(|excluded| {
            if excluded { Ok(None) } else { analyzer.analyze(&self.store).map(Some) }
        });
        match outcome {
            Ok(None) => {
                self.log(AnalysisLogEvent::ANALYZER_EXCLUDED, &title, "analyzer excluded");
            }
            Ok(Some(output)) => {
                for warning in &output.warnings {
                    let event = AnalysisLogEvent::ANALYSIS_WARNING;
                    self.log(event, &warning.subject, &warning.message);
                }
                if output.results.is_empty() {
                    let event = AnalysisLogEvent::NO_OUTCOME_MATCHED;
                    self.log(event, &title, "analyzer produced no results");
                }
                report.results.extend(output.results);
                report.warnings.extend(output.warnings);
            }
            Err(error) => {
                self.log(AnalysisLogEvent::ANALYZER_FAILED, &title, &error.to_string());
                report.failures.push(AnalyzerFailure {
                    title,
                    error,
                });
            }
        }
    }

    /// Records one event on the sink.
    fn log(&self, event: &'static str, analyzer: &str, message: &str) {
        self.sink.record(&AnalysisLogEvent::new(event, analyzer, message));
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
