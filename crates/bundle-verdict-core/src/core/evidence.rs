// crates/bundle-verdict-core/src/core/evidence.rs
// ============================================================================
// Module: Bundle Verdict Evidence Records
// Description: Collected artifacts and host fact record shapes.
// Purpose: Decode host collector output into typed facts.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`CollectedContent`] is one resolved artifact: either the local copy (empty
//! node name) or one remote node's copy. The remaining types are the JSON
//! shapes written by host collectors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::AnalyzeError;

// ============================================================================
// SECTION: Collected Content
// ============================================================================

/// One resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedContent {
    /// Producing node; empty for the local artifact.
    pub node_name: String,
    /// Raw artifact bytes.
    pub data: Vec<u8>,
}

impl CollectedContent {
    /// Creates the local artifact.
    #[must_use]
    pub const fn local(data: Vec<u8>) -> Self {
        Self {
            node_name: String::new(),
            data,
        }
    }

    /// Creates a remote node's artifact.
    #[must_use]
    pub fn remote(node_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            node_name: node_name.into(),
            data,
        }
    }

    /// Returns true for the local artifact.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.node_name.is_empty()
    }

    /// Decodes the artifact as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Decode`] when the bytes do not match `T`.
    pub fn decode<T: DeserializeOwned>(&self, what: &str) -> Result<T, AnalyzeError> {
        serde_json::from_slice(&self.data).map_err(|err| AnalyzeError::decode(what, err))
    }
}

/// Node manifest listing remote fact producers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeNames {
    /// Node names in manifest order.
    pub nodes: Vec<String>,
}

// ============================================================================
// SECTION: Host Facts
// ============================================================================

/// Memory fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryInfo {
    /// Total memory in bytes.
    pub total: u64,
}

/// Operating system fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostOsInfo {
    /// Host name.
    pub name: String,
    /// Kernel version, e.g. `5.4.0-1034-gcp`.
    pub kernel_version: String,
    /// Platform version, e.g. `18.04`.
    pub platform_version: String,
    /// Platform name, e.g. `ubuntu`.
    pub platform: String,
}

/// CPU fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CpuInfo {
    /// Logical CPU count.
    pub logical_count: u64,
    /// Physical CPU count.
    pub physical_count: u64,
    /// CPU feature flags.
    pub flags: Vec<String>,
    /// Machine architecture, e.g. `x86_64`.
    pub machine_arch: String,
}

/// Time and NTP fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeInfo {
    /// Configured timezone.
    pub timezone: String,
    /// Clock is synchronized.
    pub ntp_synchronized: bool,
    /// NTP service is active.
    pub ntp_active: bool,
}

/// Systemd unit fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceInfo {
    /// Unit name, e.g. `ufw.service`.
    #[serde(rename = "Unit")]
    pub unit: String,
    /// Load state.
    #[serde(rename = "Load")]
    pub load: String,
    /// Active state.
    #[serde(rename = "Active")]
    pub active: String,
    /// Sub state.
    #[serde(rename = "Sub")]
    pub sub: String,
}

/// Disk usage fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskUsageInfo {
    /// Filesystem size in bytes.
    pub total_bytes: u64,
    /// Used bytes.
    pub used_bytes: u64,
}
