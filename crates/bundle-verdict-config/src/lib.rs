// crates/bundle-verdict-config/src/lib.rs
// ============================================================================
// Module: Bundle Verdict Config Library
// Description: Canonical config model and validation for analysis runs.
// Purpose: Single source of truth for bundle-verdict.toml semantics.
// Dependencies: bundle-verdict-core, bundle-verdict-store, serde, toml
// ============================================================================

//! ## Overview
//! `bundle-verdict-config` defines the configuration model for an analysis
//! run: the bundle to read, where analysis events go, and engine options.
//! Validation is strict and fail-closed; a loaded config builds the
//! directory store and the log sink the engine needs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
