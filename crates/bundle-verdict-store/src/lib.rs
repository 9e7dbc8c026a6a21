// crates/bundle-verdict-store/src/lib.rs
// ============================================================================
// Module: Bundle Directory Store
// Description: EvidenceStore backend over an extracted support bundle.
// Purpose: Give the analysis engine bounded, root-confined file access.
// Dependencies: bundle-verdict-core, serde, thiserror
// ============================================================================

//! ## Overview
//! This crate provides a directory-backed [`EvidenceStore`] for bundles that
//! were unpacked to disk. Bundle contents and manifest paths are untrusted:
//! reads never leave the bundle root and are capped per file.
//!
//! [`EvidenceStore`]: bundle_verdict_core::EvidenceStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::DEFAULT_MAX_FILE_BYTES;
pub use store::DirectoryEvidenceStore;
pub use store::DirectoryStoreConfig;
pub use store::DirectoryStoreError;
pub use store::MAX_FILE_BYTES_LIMIT;
