// crates/bundle-verdict-store/src/store.rs
// ============================================================================
// Module: Directory Evidence Store
// Description: EvidenceStore backed by an extracted support bundle directory.
// Purpose: Serve bundle files by relative path with size and path limits.
// Dependencies: bundle-verdict-core, serde, thiserror
// ============================================================================

//! ## Overview
//! [`DirectoryEvidenceStore`] reads evidence from a bundle that was unpacked
//! on disk. Paths handed to the store are untrusted manifest input: they are
//! resolved strictly below the bundle root and every read is bounded by
//! [`DirectoryStoreConfig::max_file_bytes`].
//!
//! Symbolic links are not followed while listing; a direct read through a
//! link is allowed only when the target stays inside the root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use bundle_verdict_core::EvidenceStore;
use bundle_verdict_core::GlobFilter;
use bundle_verdict_core::StoreError;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default per-file read limit.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;
/// Hard upper bound for the configurable per-file read limit.
pub const MAX_FILE_BYTES_LIMIT: u64 = 256 * 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Configuration for a directory-backed evidence store.
///
/// # Invariants
/// - `root` must resolve to an existing directory.
/// - `max_file_bytes` is in `1..=MAX_FILE_BYTES_LIMIT`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryStoreConfig {
    /// Root directory of the extracted bundle.
    pub root: PathBuf,
    /// Largest file the store will return.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl DirectoryStoreConfig {
    /// Creates a config for `root` with the default read limit.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    /// Checks limits without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError::Invalid`] when the root path or the read
    /// limit is out of range.
    pub fn validate(&self) -> Result<(), DirectoryStoreError> {
        if self.max_file_bytes == 0 || self.max_file_bytes > MAX_FILE_BYTES_LIMIT {
            return Err(DirectoryStoreError::Invalid(format!(
                "max_file_bytes out of range: {} (max {MAX_FILE_BYTES_LIMIT})",
                self.max_file_bytes
            )));
        }
        validate_root_path(&self.root)
    }
}

/// Default per-file read limit for serde.
const fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while opening a directory store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryStoreError {
    /// Filesystem error.
    #[error("bundle store io error: {0}")]
    Io(String),
    /// Configuration or path rejected.
    #[error("bundle store invalid: {0}")]
    Invalid(String),
    /// File exceeded the read limit.
    #[error("bundle file exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Configured limit.
        max_bytes: u64,
        /// Size on disk when the limit tripped.
        actual_bytes: u64,
    },
}

impl From<DirectoryStoreError> for StoreError {
    fn from(error: DirectoryStoreError) -> Self {
        match error {
            DirectoryStoreError::Io(message) => Self::Io(message),
            DirectoryStoreError::Invalid(message) => Self::Invalid(message),
            DirectoryStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::TooLarge(format!("{actual_bytes} bytes exceeds limit of {max_bytes}")),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Evidence store reading an extracted bundle directory.
#[derive(Debug, Clone)]
pub struct DirectoryEvidenceStore {
    /// Canonical bundle root.
    root: PathBuf,
    /// Largest file the store will return.
    max_file_bytes: u64,
}

impl DirectoryEvidenceStore {
    /// Opens a store over `config.root`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryStoreError`] when the config is invalid or the root
    /// is missing or not a directory.
    pub fn new(config: DirectoryStoreConfig) -> Result<Self, DirectoryStoreError> {
        config.validate()?;
        let root = fs::canonicalize(&config.root).map_err(|err| {
            DirectoryStoreError::Io(format!("{}: {err}", config.root.display()))
        })?;
        if !root.is_dir() {
            return Err(DirectoryStoreError::Invalid(format!(
                "bundle root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            root,
            max_file_bytes: config.max_file_bytes,
        })
    }

    /// Canonical bundle root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured per-file read limit.
    #[must_use]
    pub const fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Maps a bundle-relative path below the root.
    fn resolve(&self, relative: &str) -> Result<PathBuf, StoreError> {
        if relative.is_empty() {
            return Err(StoreError::Invalid("bundle path must not be empty".to_string()));
        }
        if relative.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(StoreError::Invalid("bundle path exceeds length limit".to_string()));
        }
        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(name) => {
                    if name.len() > MAX_PATH_COMPONENT_LENGTH {
                        return Err(StoreError::Invalid(format!(
                            "bundle path contains an overlong component: {relative}"
                        )));
                    }
                    resolved.push(name);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StoreError::Invalid(format!(
                        "bundle path must stay relative to the root: {relative}"
                    )));
                }
            }
        }
        Ok(resolved)
    }

    /// Reads one file, bounded by the configured limit.
    fn read_limited(&self, path: &Path, relative: &str) -> Result<Vec<u8>, StoreError> {
        let file = File::open(path).map_err(|err| io_error(&err, relative))?;
        let mut bytes = Vec::new();
        (&file)
            .take(self.max_file_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| io_error(&err, relative))?;
        let read_bytes = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if read_bytes > self.max_file_bytes {
            let actual_bytes =
                file.metadata().map_or(read_bytes, |meta| meta.len().max(read_bytes));
            return Err(DirectoryStoreError::TooLarge {
                max_bytes: self.max_file_bytes,
                actual_bytes,
            }
            .into());
        }
        Ok(bytes)
    }

    /// Bundle-relative, `/`-joined form of an absolute path below the root.
    fn relative_name(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in relative.components() {
            parts.push(component.as_os_str().to_str()?);
        }
        Some(parts.join("/"))
    }
}

impl EvidenceStore for DirectoryEvidenceStore {
    fn get_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let resolved = self.resolve(path)?;
        let canonical = fs::canonicalize(&resolved).map_err(|err| io_error(&err, path))?;
        if !canonical.starts_with(&self.root) {
            return Err(StoreError::Invalid(format!("bundle path escapes the root: {path}")));
        }
        if !canonical.is_file() {
            return Err(StoreError::Invalid(format!("bundle path is not a file: {path}")));
        }
        self.read_limited(&canonical, path)
    }

    fn find_files(
        &self,
        pattern: &str,
        exclude: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>, StoreError> {
        let filter = GlobFilter::new(pattern, exclude)?;
        let prefix = filter.include().literal_prefix();
        let start = if prefix.is_empty() { self.root.clone() } else { self.resolve(prefix)? };
        let mut found = BTreeMap::new();
        if !start.is_dir() {
            return Ok(found);
        }
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let entries = fs::read_dir(&dir).map_err(|err| StoreError::Io(err.to_string()))?;
            for entry in entries {
                let entry = entry.map_err(|err| StoreError::Io(err.to_string()))?;
                let file_type = entry.file_type().map_err(|err| StoreError::Io(err.to_string()))?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }
                let Some(name) = self.relative_name(&path) else {
                    continue;
                };
                if filter.accepts(&name) {
                    let bytes = self.read_limited(&path, &name)?;
                    found.insert(name, bytes);
                }
            }
        }
        Ok(found)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps an I/O error to a store error, keeping not-found distinct.
fn io_error(error: &io::Error, relative: &str) -> StoreError {
    if error.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(relative.to_string())
    } else {
        StoreError::Io(format!("{relative}: {error}"))
    }
}

/// Validates the configured root path before it is opened.
fn validate_root_path(path: &Path) -> Result<(), DirectoryStoreError> {
    if path.as_os_str().is_empty() {
        return Err(DirectoryStoreError::Invalid("bundle root must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(DirectoryStoreError::Invalid("bundle root exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(DirectoryStoreError::Invalid(
                "bundle root contains an overlong component".to_string(),
            ));
        }
    }
    Ok(())
}
