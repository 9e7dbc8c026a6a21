// crates/bundle-verdict-core/src/runtime/analyzers/mod.rs
// ============================================================================
// Module: Bundle Verdict Analyzers
// Description: Typed analyzer specs and the closed analyzer catalogue.
// Purpose: Dispatch each analyzer variant to its evaluation routine.
// Dependencies: crate::{core, interfaces}, serde
// ============================================================================

//! ## Overview
//! [`Analyzer`] is externally tagged, so a manifest entry reads
//! `{"hostMemory": {"outcomes": [...]}}`. Every variant wraps a typed spec
//! carrying [`AnalyzeMeta`] and exposes the same three operations: a title,
//! the exclusion flag, and `analyze` against an [`EvidenceStore`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod compare;
pub mod container_runtime;
pub mod event;
pub mod host;
pub mod pods;
pub mod text;
pub mod workload;

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzerOutput;
use crate::interfaces::EvidenceStore;

pub use compare::JsonCompareAnalyze;
pub use compare::YamlCompareAnalyze;
pub use container_runtime::ContainerRuntimeAnalyze;
pub use event::EventAnalyze;
pub use host::HostAnalyze;
pub use pods::ClusterPodStatusesAnalyze;
pub use text::TextAnalyzeSpec;
pub use workload::WorkloadKind;
pub use workload::WorkloadStatusAnalyze;

// ============================================================================
// SECTION: Catalogue
// ============================================================================

/// One analyzer entry of a bundle manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Analyzer {
    /// Total host memory.
    HostMemory(HostAnalyze),
    /// Host platform and kernel versions.
    #[serde(rename = "hostOS")]
    HostOs(HostAnalyze),
    /// Host CPU counts, flags and architecture.
    #[serde(rename = "hostCPU")]
    HostCpu(HostAnalyze),
    /// Host timezone and NTP state.
    HostTime(HostAnalyze),
    /// Host kernel parameters.
    HostSysctl(HostAnalyze),
    /// Host systemd units.
    HostServices(HostAnalyze),
    /// Host disk usage of one collector.
    HostDiskUsage(HostAnalyze),
    /// Per-pod status checks.
    ClusterPodStatuses(ClusterPodStatusesAnalyze),
    /// Node container runtime.
    ContainerRuntime(ContainerRuntimeAnalyze),
    /// Deployment readiness.
    DeploymentStatus(WorkloadStatusAnalyze),
    /// StatefulSet readiness.
    StatefulsetStatus(WorkloadStatusAnalyze),
    /// Job completion.
    JobStatus(WorkloadStatusAnalyze),
    /// Kubernetes event existence.
    Event(EventAnalyze),
    /// YAML document equality.
    YamlCompare(YamlCompareAnalyze),
    /// JSON document equality.
    JsonCompare(JsonCompareAnalyze),
    /// Regex checks over text files.
    TextAnalyze(TextAnalyzeSpec),
}

impl Analyzer {
    /// Shared metadata of the wrapped spec.
    #[must_use]
    pub const fn meta(&self) -> &AnalyzeMeta {
        match self {
            Self::HostMemory(spec)
            | Self::HostOs(spec)
            | Self::HostCpu(spec)
            | Self::HostTime(spec)
            | Self::HostSysctl(spec)
            | Self::HostServices(spec)
            | Self::HostDiskUsage(spec) => &spec.meta,
            Self::ClusterPodStatuses(spec) => &spec.meta,
            Self::ContainerRuntime(spec) => &spec.meta,
            Self::DeploymentStatus(spec) | Self::StatefulsetStatus(spec) | Self::JobStatus(spec) => {
                &spec.meta
            }
            Self::Event(spec) => &spec.meta,
            Self::YamlCompare(spec) => &spec.meta,
            Self::JsonCompare(spec) => &spec.meta,
            Self::TextAnalyze(spec) => &spec.meta,
        }
    }

    /// Analyzer-level title; per-unit results may refine it.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::HostMemory(spec) => spec.meta.title_or(host::MEMORY_TITLE),
            Self::HostOs(spec) => spec.meta.title_or(host::OS_TITLE),
            Self::HostCpu(spec) => spec.meta.title_or(host::CPU_TITLE),
            Self::HostTime(spec) => spec.meta.title_or(host::TIME_TITLE),
            Self::HostSysctl(spec) => spec.meta.title_or(host::SYSCTL_TITLE),
            Self::HostServices(spec) => spec.meta.title_or(host::SERVICES_TITLE),
            Self::HostDiskUsage(spec) => spec.disk_usage_title(),
            Self::ClusterPodStatuses(spec) => spec.meta.title_or(pods::POD_STATUSES_TITLE),
            Self::ContainerRuntime(spec) => {
                spec.meta.title_or(container_runtime::CONTAINER_RUNTIME_TITLE)
            }
            Self::DeploymentStatus(spec) => spec.title(WorkloadKind::Deployment.label()),
            Self::StatefulsetStatus(spec) => spec.title(WorkloadKind::StatefulSet.label()),
            Self::JobStatus(spec) => spec.title("Job"),
            Self::Event(spec) => spec.title(),
            Self::YamlCompare(spec) => spec.title(),
            Self::JsonCompare(spec) => spec.title(),
            Self::TextAnalyze(spec) => spec.title(),
        }
    }

    /// Resolves the exclusion flag.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Invalid`] when `exclude` is not bool-like.
    pub fn is_excluded(&self) -> Result<bool, AnalyzeError> {
        self.meta().is_excluded()
    }

    /// Evaluates the analyzer against a bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError`] when evidence cannot be read or decoded, a
    /// when-clause is malformed, or a template fails to render.
    pub fn analyze(&self, store: &dyn EvidenceStore) -> Result<AnalyzerOutput, AnalyzeError> {
        match self {
            Self::HostMemory(spec) => host::analyze_memory(store, spec),
            Self::HostOs(spec) => host::analyze_os(store, spec),
            Self::HostCpu(spec) => host::analyze_cpu(store, spec),
            Self::HostTime(spec) => host::analyze_time(store, spec),
            Self::HostSysctl(spec) => host::analyze_sysctl(store, spec),
            Self::HostServices(spec) => host::analyze_services(store, spec),
            Self::HostDiskUsage(spec) => host::analyze_disk_usage(store, spec),
            Self::ClusterPodStatuses(spec) => pods::analyze_pod_statuses(store, spec),
            Self::ContainerRuntime(spec) => container_runtime::analyze_container_runtime(store, spec),
            Self::DeploymentStatus(spec) => {
                workload::analyze_workload(store, spec, WorkloadKind::Deployment)
            }
            Self::StatefulsetStatus(spec) => {
                workload::analyze_workload(store, spec, WorkloadKind::StatefulSet)
            }
            Self::JobStatus(spec) => workload::analyze_job(store, spec),
            Self::Event(spec) => event::analyze_event(store, spec),
            Self::YamlCompare(spec) => compare::analyze_yaml_compare(store, spec),
            Self::JsonCompare(spec) => compare::analyze_json_compare(store, spec),
            Self::TextAnalyze(spec) => text::analyze_text(store, spec),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
