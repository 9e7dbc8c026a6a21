// crates/bundle-verdict-core/src/runtime/analyzers/container_runtime.rs
// ============================================================================
// Module: Container Runtime Analyzer
// Description: Scheme checks over node container runtime URLs.
// Purpose: Verify which container runtime the cluster nodes report.
// Dependencies: crate::{core, interfaces, runtime}, serde
// ============================================================================

//! ## Overview
//! Each node reports a runtime URL such as `containerd://1.7.2`; only the
//! scheme is compared. `== containerd` holds when any node runs containerd,
//! `!= docker` holds when no node does.

use serde::Deserialize;
use serde::Serialize;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzerOutput;
use crate::core::ComparisonOperator;
use crate::core::Condition;
use crate::core::Outcome;
use crate::core::kube::Node;
use crate::core::kube::decode_object_list;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::runtime::aggregator::ResultAggregator;
use crate::runtime::conditions::tokens_equal;
use crate::runtime::resolver::OutcomeResolver;

/// Default analyzer title.
pub const CONTAINER_RUNTIME_TITLE: &str = "Container Runtime";

/// `containerRuntime` analyzer spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerRuntimeAnalyze {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

/// Evaluates a `containerRuntime` analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when the node list is missing or malformed, or a
/// when-clause is not a two-token equality.
pub fn analyze_container_runtime(
    store: &dyn EvidenceStore,
    spec: &ContainerRuntimeAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let strict = spec.meta.is_strict()?;
    let bytes = store.get_file(paths::CLUSTER_NODES_PATH)?;
    let nodes = decode_object_list::<Node>("node list", &bytes)?;
    let schemes: Vec<&str> = nodes
        .iter()
        .map(|node| runtime_scheme(&node.status.node_info.container_runtime_version))
        .collect();

    let title = spec.meta.title_or(CONTAINER_RUNTIME_TITLE);
    let mut aggregator = ResultAggregator::new();
    let resolution = OutcomeResolver::new(&title, &spec.outcomes)
        .resolve(aggregator.warnings(), |_, when| evaluate_runtime(when, &schemes))?;
    aggregator.push_result(resolution.into_result());
    Ok(aggregator.finish(strict))
}

/// Scheme of a runtime URL; empty when the URL has none.
fn runtime_scheme(url: &str) -> &str {
    url.split_once("://").map_or("", |(scheme, _)| scheme)
}

/// Evaluates `== scheme` or `!= scheme` across all nodes.
fn evaluate_runtime(when: &str, schemes: &[&str]) -> Result<bool, AnalyzeError> {
    let condition = Condition::parse_unselected(when)?;
    let expected = condition.operand.as_str();
    match condition.operator {
        ComparisonOperator::Equal => {
            Ok(schemes.iter().any(|scheme| tokens_equal(scheme, expected)))
        }
        ComparisonOperator::NotEqual => {
            Ok(!schemes.iter().any(|scheme| tokens_equal(scheme, expected)))
        }
        other => Err(AnalyzeError::ConditionParse(format!(
            "operator {other} is not supported for container runtimes"
        ))),
    }
}
