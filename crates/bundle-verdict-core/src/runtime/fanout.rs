// crates/bundle-verdict-core/src/runtime/fanout.rs
// ============================================================================
// Module: Bundle Verdict Fan-out Resolver
// Description: Resolves host evidence locally or across remote nodes.
// Purpose: Factor the local-or-remote lookup shared by every host analyzer.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! Resolution tries the local artifact first and stops there when it exists.
//! Otherwise the node manifest names the remote producers:
//! - a missing manifest yields no evidence (not an error),
//! - an undecodable manifest fails the resolution,
//! - every listed node must have its artifact; one missing node fails the
//!   whole resolution and no partial results are returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AnalyzeError;
use crate::core::CollectedContent;
use crate::core::NodeNames;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Fan-out Resolution
// ============================================================================

/// Path fragments describing one piece of host evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutPaths<'a> {
    /// Local artifact path.
    pub local_path: &'a str,
    /// Base directory of per-node artifacts.
    pub remote_base_dir: &'a str,
    /// Artifact file name inside each node directory.
    pub remote_file_name: &'a str,
}

impl<'a> FanoutPaths<'a> {
    /// Paths for a fact collected under the standard host system directory.
    #[must_use]
    pub const fn host_fact(local_path: &'a str, file_name: &'a str) -> Self {
        Self {
            local_path,
            remote_base_dir: paths::NODE_INFO_BASE_DIR,
            remote_file_name: file_name,
        }
    }
}

/// Resolves evidence to the local artifact or one artifact per remote node.
///
/// # Errors
///
/// Returns [`AnalyzeError::Store`] when the local read fails for a reason
/// other than absence, [`AnalyzeError::Decode`] when the node manifest is
/// malformed, and [`AnalyzeError::PartialFanout`] when any node artifact is
/// unreadable.
pub fn retrieve_collected_contents(
    store: &dyn EvidenceStore,
    fanout: FanoutPaths<'_>,
) -> Result<Vec<CollectedContent>, AnalyzeError> {
    match store.get_file(fanout.local_path) {
        Ok(data) => return Ok(vec![CollectedContent::local(data)]),
        Err(StoreError::NotFound(_)) => {}
        Err(err) => return Err(err.into()),
    }

    let manifest = match store.get_file(paths::NODE_LIST_PATH) {
        Ok(data) => data,
        Err(StoreError::NotFound(_)) => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    let nodes: NodeNames = serde_json::from_slice(&manifest)
        .map_err(|err| AnalyzeError::decode("node names manifest", err))?;

    nodes
        .nodes
        .iter()
        .map(|node| {
            let path = paths::node_fact_path(fanout.remote_base_dir, node, fanout.remote_file_name);
            store.get_file(&path).map(|data| CollectedContent::remote(node, data)).map_err(|err| {
                AnalyzeError::PartialFanout(format!("failed to retrieve content for node {node}: {err}"))
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
