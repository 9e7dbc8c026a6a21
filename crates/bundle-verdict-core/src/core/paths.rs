// crates/bundle-verdict-core/src/core/paths.rs
// ============================================================================
// Module: Bundle Verdict Bundle Paths
// Description: Well-known evidence locations inside an unpacked bundle.
// Purpose: Keep bundle layout conventions in one place.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Paths are POSIX-style and relative to the bundle root. Host facts live
//! under `host-collectors/`; per-node remote facts live under
//! `host-collectors/system/<node>/`; cluster resources live under
//! `cluster-resources/<kind>/<namespace>.json`.

// ============================================================================
// SECTION: Host Collectors
// ============================================================================

/// Manifest listing remote nodes that produced per-node facts.
pub const NODE_LIST_PATH: &str = "host-collectors/system/node_list.json";
/// Base directory for per-node remote facts.
pub const NODE_INFO_BASE_DIR: &str = "host-collectors/system";
/// Base directory for local host facts.
pub const HOST_SYSTEM_DIR: &str = "host-collectors/system";
/// Base directory for disk usage collectors.
pub const HOST_DISK_USAGE_DIR: &str = "host-collectors/diskUsage";

/// Memory fact file name.
pub const HOST_MEMORY_FILE: &str = "memory.json";
/// OS info fact file name.
pub const HOST_OS_INFO_FILE: &str = "hostos_info.json";
/// CPU fact file name.
pub const HOST_CPU_FILE: &str = "cpu.json";
/// Time fact file name.
pub const HOST_TIME_FILE: &str = "time.json";
/// Sysctl fact file name.
pub const HOST_SYSCTL_FILE: &str = "sysctl.json";
/// Systemd services fact file name.
pub const HOST_SERVICES_FILE: &str = "systemctl_services.json";

/// Local path of a host fact file.
#[must_use]
pub fn host_fact_path(file_name: &str) -> String {
    format!("{HOST_SYSTEM_DIR}/{file_name}")
}

/// Remote path of a host fact file for one node.
#[must_use]
pub fn node_fact_path(base_dir: &str, node: &str, file_name: &str) -> String {
    format!("{base_dir}/{node}/{file_name}")
}

// ============================================================================
// SECTION: Cluster Resources
// ============================================================================

/// Cluster resources root.
pub const CLUSTER_RESOURCES_DIR: &str = "cluster-resources";
/// Cluster node list.
pub const CLUSTER_NODES_PATH: &str = "cluster-resources/nodes.json";
/// Namespace used when an analyzer does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Path of a namespaced resource file.
#[must_use]
pub fn cluster_resource_path(kind: &str, namespace: &str) -> String {
    format!("{CLUSTER_RESOURCES_DIR}/{kind}/{namespace}.json")
}

/// Glob over every namespace file of a resource kind.
#[must_use]
pub fn cluster_resource_glob(kind: &str) -> String {
    format!("{CLUSTER_RESOURCES_DIR}/{kind}/*.json")
}

/// Namespace encoded in a resource file path (`.../<namespace>.json`).
#[must_use]
pub fn namespace_of(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".json").unwrap_or(file)
}

/// Joins a collector name and a relative file name.
#[must_use]
pub fn join(collector: &str, file: &str) -> String {
    let collector = collector.trim_end_matches('/');
    let file = file.trim_start_matches('/');
    if collector.is_empty() {
        file.to_string()
    } else if file.is_empty() {
        collector.to_string()
    } else {
        format!("{collector}/{file}")
    }
}
