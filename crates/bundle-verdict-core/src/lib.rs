// crates/bundle-verdict-core/src/lib.rs
// ============================================================================
// Module: Bundle Verdict Core Library
// Description: Public API surface for the support-bundle analyzer core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Bundle Verdict evaluates analyzer manifests against an unpacked support
//! bundle and reports a Pass, Warn, Fail or Fatal verdict per check. The core
//! is storage-agnostic: evidence arrives through [`EvidenceStore`] and
//! structured logs leave through [`AnalysisLogSink`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AnalysisLogEvent;
pub use interfaces::AnalysisLogSink;
pub use interfaces::EvidenceStore;
pub use interfaces::StoreError;
pub use runtime::AnalysisEngine;
pub use runtime::AnalysisEngineConfig;
pub use runtime::AnalysisReport;
pub use runtime::Analyzer;
pub use runtime::AnalyzerFailure;
pub use runtime::FileLogSink;
pub use runtime::GlobFilter;
pub use runtime::GlobPattern;
pub use runtime::InMemoryEvidenceStore;
pub use runtime::MemoryLogSink;
pub use runtime::NoopLogSink;
pub use runtime::StderrLogSink;
