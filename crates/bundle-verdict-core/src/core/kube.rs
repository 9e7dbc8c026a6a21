// crates/bundle-verdict-core/src/core/kube.rs
// ============================================================================
// Module: Bundle Verdict Kubernetes Evidence
// Description: Minimal Kubernetes object shapes read from cluster resources.
// Purpose: Decode collected resources and derive pod status predicates.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Only the fields analyzers read are modelled; unknown fields are ignored.
//! Collected resource files hold either a JSON array of objects or a list
//! object with an `items` array, and [`decode_object_list`] accepts both.
//!
//! [`pod_status_reason`] mirrors the status column printed by `kubectl get
//! pods`. [`is_pod_unhealthy`] is the derived predicate behind the `Healthy`
//! pseudo-token in pod status when-clauses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::AnalyzeError;

// ============================================================================
// SECTION: Common Types
// ============================================================================

/// Object metadata subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
    /// Deletion timestamp when the object is terminating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<String>,
}

/// Reference to a Kubernetes object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectReference {
    /// API version of the referenced object.
    pub api_version: String,
    /// Kind of the referenced object.
    pub kind: String,
    /// Namespace of the referenced object.
    pub namespace: String,
    /// Name of the referenced object.
    pub name: String,
}

/// Decodes a collected resource file holding a list object or a bare array.
///
/// # Errors
///
/// Returns [`AnalyzeError::Decode`] when the payload is neither shape.
pub fn decode_object_list<T: DeserializeOwned>(
    what: &str,
    bytes: &[u8],
) -> Result<Vec<T>, AnalyzeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| AnalyzeError::decode(what, err))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(AnalyzeError::decode(what, "items is not an array")),
        },
        _ => return Err(AnalyzeError::decode(what, "expected a list object or array")),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|err| AnalyzeError::decode(what, err)))
        .collect()
}

// ============================================================================
// SECTION: Pods
// ============================================================================

/// Pod subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pod {
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Spec.
    pub spec: PodSpec,
    /// Status.
    pub status: PodStatus,
}

/// Pod spec subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodSpec {
    /// Init containers in declaration order.
    pub init_containers: Vec<Container>,
}

/// Container spec subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    /// Container name.
    pub name: String,
    /// Restart policy; `Always` marks a native sidecar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
}

/// Pod status subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodStatus {
    /// Pod phase.
    pub phase: String,
    /// Machine-readable reason.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
    /// Pod conditions.
    pub conditions: Vec<PodCondition>,
    /// Init container statuses.
    pub init_container_statuses: Vec<ContainerStatus>,
    /// Container statuses.
    pub container_statuses: Vec<ContainerStatus>,
}

/// Pod condition subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodCondition {
    /// Condition type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Condition status (`True`, `False`, `Unknown`).
    pub status: String,
    /// Condition message.
    pub message: String,
}

/// Container status subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStatus {
    /// Container name.
    pub name: String,
    /// Readiness.
    pub ready: bool,
    /// Current state.
    pub state: ContainerState,
    /// Previous state.
    pub last_state: ContainerState,
}

/// Container state; at most one member is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerState {
    /// Waiting state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting: Option<ContainerStateWaiting>,
    /// Running state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<ContainerStateRunning>,
    /// Terminated state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated: Option<ContainerStateTerminated>,
}

/// Waiting container state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStateWaiting {
    /// Waiting reason.
    pub reason: String,
    /// Waiting message.
    pub message: String,
}

/// Running container state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStateRunning {
    /// Start time.
    pub started_at: String,
}

/// Terminated container state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStateTerminated {
    /// Termination reason.
    pub reason: String,
    /// Termination message.
    pub message: String,
    /// Exit code.
    pub exit_code: i32,
    /// Signal number, zero when none.
    pub signal: i32,
}

/// Returns the derived status reason and message for a pod.
#[must_use]
pub fn pod_status_reason(pod: &Pod) -> (String, String) {
    let status = &pod.status;
    let mut reason = if status.reason.is_empty() {
        status.phase.clone()
    } else {
        status.reason.clone()
    };
    let mut message = String::new();

    let mut initializing = false;
    for (index, container) in status.init_container_statuses.iter().enumerate() {
        let state = &container.state;
        match (&state.terminated, &state.waiting) {
            (Some(terminated), _) if terminated.exit_code == 0 => continue,
            (Some(terminated), _) => {
                reason = if !terminated.reason.is_empty() {
                    format!("Init:{}", terminated.reason)
                } else if terminated.signal != 0 {
                    format!("Init:Signal:{}", terminated.signal)
                } else {
                    format!("Init:ExitCode:{}", terminated.exit_code)
                };
            }
            (None, Some(waiting))
                if !waiting.reason.is_empty() && waiting.reason != "PodInitializing" =>
            {
                reason = format!("Init:{}", waiting.reason);
            }
            _ if is_native_sidecar(pod, index) && state.running.is_some() => continue,
            _ => {
                reason = format!("Init:{index}/{}", pod.spec.init_containers.len());
            }
        }
        initializing = true;
        if let Some(last) = &container.last_state.terminated {
            message.push_str(&last.message);
        }
        break;
    }

    if !initializing {
        let mut has_running = false;
        for container in status.container_statuses.iter().rev() {
            let state = &container.state;
            if let Some(waiting) = state.waiting.as_ref().filter(|w| !w.reason.is_empty()) {
                reason.clone_from(&waiting.reason);
                if let Some(last) = &container.last_state.terminated {
                    if last.message.is_empty() {
                        message.push_str(&format!("ExitCode:{}", last.exit_code));
                    } else {
                        message.push_str(&last.message);
                    }
                }
            } else if let Some(terminated) = &state.terminated {
                if terminated.reason.is_empty() {
                    reason = if terminated.signal != 0 {
                        format!("Signal:{}", terminated.signal)
                    } else {
                        format!("ExitCode:{}", terminated.exit_code)
                    };
                } else {
                    reason.clone_from(&terminated.reason);
                    message.push_str(&format!("ExitCode:{}", terminated.exit_code));
                }
            } else if container.ready && state.running.is_some() {
                has_running = true;
            }
        }

        if reason == "Completed" && has_running {
            reason = if has_condition(status, "Ready", "True") {
                "Running".to_string()
            } else {
                "NotReady".to_string()
            };
        }

        for condition in &status.conditions {
            if condition.kind == "PodScheduled" && condition.status == "False" {
                message.push_str(&condition.message);
            }
        }
    }

    if pod.metadata.deletion_timestamp.is_some() {
        reason = if status.reason == "NodeLost" {
            "Unknown".to_string()
        } else {
            "Terminating".to_string()
        };
    }

    (reason, message)
}

/// Returns true when a pod should be reported as unhealthy.
///
/// Failed, Pending and Unknown phases are unhealthy. Completed pods are
/// healthy. Any other derived reason than `Running` is unhealthy, and a
/// running pod is unhealthy while any container is not ready.
#[must_use]
pub fn is_pod_unhealthy(pod: &Pod) -> bool {
    if matches!(pod.status.phase.as_str(), "Failed" | "Pending" | "Unknown") {
        return true;
    }
    let (reason, _) = pod_status_reason(pod);
    if reason == "Completed" {
        return false;
    }
    if reason != "Running" {
        return true;
    }
    pod.status.container_statuses.iter().any(|status| !status.ready)
}

/// Init container at `index` restarts always (Kubernetes native sidecar).
fn is_native_sidecar(pod: &Pod, index: usize) -> bool {
    pod.spec
        .init_containers
        .get(index)
        .and_then(|container| container.restart_policy.as_deref())
        == Some("Always")
}

/// Pod carries a condition of the given type and status.
fn has_condition(status: &PodStatus, kind: &str, value: &str) -> bool {
    status.conditions.iter().any(|condition| condition.kind == kind && condition.status == value)
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Event subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Object the event is about.
    pub involved_object: ObjectReference,
    /// Short machine-readable reason.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
    /// Event type (`Normal`, `Warning`).
    #[serde(rename = "type")]
    pub kind: String,
}

// ============================================================================
// SECTION: Nodes
// ============================================================================

/// Node subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Status.
    pub status: NodeStatus,
}

/// Node status subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStatus {
    /// System info reported by the kubelet.
    pub node_info: NodeSystemInfo,
}

/// Node system info subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSystemInfo {
    /// Container runtime URL, e.g. `containerd://1.7.2`.
    pub container_runtime_version: String,
}

// ============================================================================
// SECTION: Workloads
// ============================================================================

/// Deployment or StatefulSet subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workload {
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Spec.
    pub spec: WorkloadSpec,
    /// Status.
    pub status: WorkloadStatus,
}

impl Workload {
    /// Desired replica count; Kubernetes defaults an unset value to one.
    #[must_use]
    pub fn desired_replicas(&self) -> i32 {
        self.spec.replicas.unwrap_or(1)
    }
}

/// Workload spec subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadSpec {
    /// Desired replicas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

/// Workload status subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadStatus {
    /// Observed replicas.
    pub replicas: i32,
    /// Ready replicas.
    pub ready_replicas: i32,
}

/// Job subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Spec.
    pub spec: JobSpec,
    /// Status.
    pub status: JobStatus,
}

/// Job spec subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSpec {
    /// Required successful completions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<i32>,
}

/// Job status subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobStatus {
    /// Succeeded pod count.
    pub succeeded: i32,
    /// Failed pod count.
    pub failed: i32,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
