// crates/bundle-verdict-core/src/core/mod.rs
// ============================================================================
// Module: Bundle Verdict Core Types
// Description: Outcomes, results, conditions and evidence record shapes.
// Purpose: Provide stable, serializable types shared by every analyzer.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what analyzers read (collected evidence, Kubernetes
//! objects, host facts), what they evaluate (when-clauses, quantities,
//! versions) and what they produce (results and warnings).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod condition;
pub mod error;
pub mod evidence;
pub mod kube;
pub mod meta;
pub mod outcome;
pub mod paths;
pub mod quantity;
pub mod result;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use condition::ComparisonOperator;
pub use condition::Condition;
pub use error::AnalyzeError;
pub use evidence::CollectedContent;
pub use evidence::CpuInfo;
pub use evidence::DiskUsageInfo;
pub use evidence::HostOsInfo;
pub use evidence::MemoryInfo;
pub use evidence::NodeNames;
pub use evidence::ServiceInfo;
pub use evidence::TimeInfo;
pub use kube::ObjectReference;
pub use meta::AnalyzeMeta;
pub use meta::BoolOrString;
pub use outcome::Outcome;
pub use outcome::SingleOutcome;
pub use outcome::Verdict;
pub use quantity::parse_quantity;
pub use result::AnalyzeResult;
pub use result::AnalyzeWarning;
pub use result::AnalyzerOutput;
pub use version::DottedVersion;
