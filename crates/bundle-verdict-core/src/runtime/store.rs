// crates/bundle-verdict-core/src/runtime/store.rs
// ============================================================================
// Module: Bundle Verdict In-Memory Evidence Store
// Description: Evidence store backed by an in-memory path map.
// Purpose: Serve bundles assembled in memory and back deterministic tests.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryEvidenceStore`] keeps artifacts in a sorted map keyed by
//! bundle-relative path, so glob enumeration order is deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::interfaces::EvidenceStore;
use crate::interfaces::StoreError;
use crate::runtime::glob::GlobFilter;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory evidence store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEvidenceStore {
    /// Artifacts keyed by bundle-relative path.
    files: BTreeMap<String, Vec<u8>>,
}

impl InMemoryEvidenceStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Adds or replaces an artifact.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    /// Number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true when no artifacts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl EvidenceStore for InMemoryEvidenceStore {
    fn get_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.files.get(path).cloned().ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn find_files(
        &self,
        pattern: &str,
        exclude: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>, StoreError> {
        let filter = GlobFilter::new(pattern, exclude)?;
        Ok(self
            .files
            .iter()
            .filter(|(path, _)| filter.accepts(path))
            .map(|(path, data)| (path.clone(), data.clone()))
            .collect())
    }
}
