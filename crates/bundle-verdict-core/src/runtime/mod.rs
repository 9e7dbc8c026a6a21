// crates/bundle-verdict-core/src/runtime/mod.rs
// ============================================================================
// Module: Bundle Verdict Runtime
// Description: Outcome resolution, condition evaluators, analyzers and engine.
// Purpose: Turn collected bundle evidence into ordered analyzer results.
// Dependencies: crate::{core, interfaces}, jsonpath_lib, regex, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! Runtime modules resolve outcome lists against evidence pulled from an
//! [`crate::interfaces::EvidenceStore`]. Every analyzer goes through the same
//! resolver, fan-out lookup and templater, and the engine is the one driver
//! over a manifest.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregator;
pub mod analyzers;
pub mod conditions;
pub mod engine;
pub mod fanout;
pub mod glob;
pub mod log;
pub mod resolver;
pub mod store;
pub mod template;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregator::ResultAggregator;
pub use aggregator::node_title;
pub use analyzers::Analyzer;
pub use engine::AnalysisEngine;
pub use engine::AnalysisEngineConfig;
pub use engine::AnalysisReport;
pub use engine::AnalyzerFailure;
pub use fanout::FanoutPaths;
pub use fanout::retrieve_collected_contents;
pub use glob::GlobFilter;
pub use glob::GlobPattern;
pub use log::FileLogSink;
pub use log::MemoryLogSink;
pub use log::NoopLogSink;
pub use log::StderrLogSink;
pub use resolver::EmptyWhen;
pub use resolver::OutcomeResolver;
pub use resolver::Resolution;
pub use store::InMemoryEvidenceStore;
pub use template::MissingField;
pub use template::render;
pub use template::render_with;
