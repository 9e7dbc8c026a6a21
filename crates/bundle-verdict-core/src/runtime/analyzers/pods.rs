// crates/bundle-verdict-core/src/runtime/analyzers/pods.rs
// ============================================================================
// Module: Cluster Pod Status Analyzer
// Description: Per-pod outcome resolution over collected pod lists.
// Purpose: Report pods whose phase or derived reason matches an outcome.
// Dependencies: crate::{core, interfaces, runtime}, serde, serde_json
// ============================================================================

//! ## Overview
//! Pods are read from every collected namespace file, optionally narrowed to
//! `namespaces`. Each pod gets a derived reason when the collected status has
//! none, and a message assembled from its Warning events when still empty.
//! Outcomes compare one token against the pod phase or reason; the `Healthy`
//! token maps to the pod health predicate. Malformed outcomes are reported
//! once as warnings and never match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzeResult;
use crate::core::AnalyzeWarning;
use crate::core::AnalyzerOutput;
use crate::core::ComparisonOperator;
use crate::core::ObjectReference;
use crate::core::Outcome;
use crate::core::SingleOutcome;
use crate::core::Verdict;
use crate::core::kube::Event;
use crate::core::kube::Pod;
use crate::core::kube::decode_object_list;
use crate::core::kube::is_pod_unhealthy;
use crate::core::kube::pod_status_reason;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::runtime::aggregator::ResultAggregator;
use crate::runtime::conditions::tokens_equal;
use crate::runtime::template::render;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default analyzer title.
pub const POD_STATUSES_TITLE: &str = "Cluster Pod Status";
/// Per-pod title template used without a check name.
const DEFAULT_POD_TITLE: &str = "Pod {{ .Namespace }}/{{ .Name }} status";
/// Per-pod message template used when an outcome has no message.
const DEFAULT_POD_MESSAGE: &str =
    "Pod {{ .Namespace }}/{{ .Name }} status is {{ .Status.Reason }}. {{ .Status.Message }}";
/// Pseudo-token mapped to the pod health predicate.
const HEALTHY_TOKEN: &str = "Healthy";
/// Collected pods directory.
const PODS_DIR: &str = "pods";
/// Collected events directory.
const EVENTS_DIR: &str = "events";

// ============================================================================
// SECTION: Spec
// ============================================================================

/// `clusterPodStatuses` analyzer spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterPodStatusesAnalyze {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Namespaces to inspect; empty inspects all.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Test applied to a pod by one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PodTest {
    /// Empty when-clause.
    Always,
    /// `Healthy` comparison; `negated` for inequality.
    Healthy {
        /// Inequality operator.
        negated: bool,
    },
    /// Phase or reason comparison.
    Token {
        /// Inequality operator.
        negated: bool,
        /// Expected phase or reason.
        token: String,
    },
}

impl PodTest {
    /// Parses a when-clause; the error text becomes a warning.
    fn parse(when: &str) -> Result<Self, String> {
        let tokens = when.split_whitespace().collect::<Vec<_>>();
        let (operator, token) = match tokens.as_slice() {
            [] => return Ok(Self::Always),
            [operator, token, ..] => (*operator, *token),
            [_] => return Err(format!("invalid when-clause '{when}'")),
        };
        let negated = match ComparisonOperator::parse(operator) {
            Ok(ComparisonOperator::Equal) => false,
            Ok(ComparisonOperator::NotEqual) => true,
            Ok(other) => return Err(format!("operator {other} is not supported for pods")),
            Err(err) => return Err(err.to_string()),
        };
        if tokens_equal(token, HEALTHY_TOKEN) {
            Ok(Self::Healthy {
                negated,
            })
        } else {
            Ok(Self::Token {
                negated,
                token: token.to_string(),
            })
        }
    }

    /// Applies the test to a pod whose reason has been derived.
    fn matches(&self, pod: &Pod) -> bool {
        match self {
            Self::Always => true,
            Self::Healthy {
                negated,
            } => is_pod_unhealthy(pod) == *negated,
            Self::Token {
                negated,
                token,
            } => {
                let equal = tokens_equal(token, &pod.status.phase)
                    || tokens_equal(token, &pod.status.reason);
                equal != *negated
            }
        }
    }
}

/// Outcome slot paired with its parsed test.
struct PodRule<'a> {
    /// Verdict of the slot.
    verdict: Verdict,
    /// Populated slot.
    outcome: &'a SingleOutcome,
    /// Parsed when-clause.
    test: PodTest,
}

/// Parses every outcome once, warning about the malformed ones.
fn compile_rules<'a>(
    outcomes: &'a [Outcome],
    subject: &str,
    warnings: &mut Vec<AnalyzeWarning>,
) -> Vec<PodRule<'a>> {
    let mut rules = Vec::with_capacity(outcomes.len());
    for (index, outcome) in outcomes.iter().enumerate() {
        let Some((verdict, single)) = outcome.verdict() else {
            warnings.push(AnalyzeWarning::new(
                subject,
                format!("outcome {index} has no verdict populated; skipped"),
            ));
            continue;
        };
        match PodTest::parse(&single.when) {
            Ok(test) => rules.push(PodRule {
                verdict,
                outcome: single,
                test,
            }),
            Err(reason) => warnings.push(AnalyzeWarning::new(
                subject,
                format!("outcome {index} skipped: {reason}"),
            )),
        }
    }
    rules
}

// ============================================================================
// SECTION: Analysis
// ============================================================================

/// Evaluates a `clusterPodStatuses` analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when pod or event files cannot be read or decoded,
/// or when a title or message template fails to render.
pub fn analyze_pod_statuses(
    store: &dyn EvidenceStore,
    spec: &ClusterPodStatusesAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let strict = spec.meta.is_strict()?;
    let subject = spec.meta.title_or(POD_STATUSES_TITLE);
    let mut aggregator = ResultAggregator::new();
    let rules = compile_rules(&spec.outcomes, &subject, aggregator.warnings());
    let mut events = EventCache::default();

    let files = store.find_files(&paths::cluster_resource_glob(PODS_DIR), &[])?;
    for (path, bytes) in &files {
        let namespace = paths::namespace_of(path);
        if !spec.namespaces.is_empty() && !spec.namespaces.iter().any(|ns| ns == namespace) {
            continue;
        }
        let what = format!("pods list for namespace {namespace}");
        for mut pod in decode_object_list::<Pod>(&what, bytes)? {
            if pod.status.reason.is_empty() {
                let (reason, message) = pod_status_reason(&pod);
                pod.status.reason = reason;
                pod.status.message = message;
            }
            if pod.status.message.is_empty() {
                pod.status.message = events.warning_messages(store, &pod)?;
            }
            if let Some(result) = resolve_pod(&spec.meta, &rules, &pod)? {
                aggregator.push_result(result);
            }
        }
    }
    Ok(aggregator.finish(strict))
}

/// Returns the result of the first rule matching the pod.
fn resolve_pod(
    meta: &AnalyzeMeta,
    rules: &[PodRule<'_>],
    pod: &Pod,
) -> Result<Option<AnalyzeResult>, AnalyzeError> {
    let Some(rule) = rules.iter().find(|rule| rule.test.matches(pod)) else {
        return Ok(None);
    };
    let context = pod_context(pod)?;
    let title_template =
        if meta.check_name.is_empty() { DEFAULT_POD_TITLE } else { meta.check_name.as_str() };
    let message_template = if rule.outcome.message.is_empty() {
        DEFAULT_POD_MESSAGE
    } else {
        rule.outcome.message.as_str()
    };

    let mut result =
        AnalyzeResult::matched(render(title_template, &context)?, rule.verdict, rule.outcome);
    result.message = render(message_template, &context)?.trim().to_string();
    result.involved_object = Some(ObjectReference {
        api_version: "v1".to_string(),
        kind: "Pod".to_string(),
        namespace: pod.metadata.namespace.clone(),
        name: pod.metadata.name.clone(),
    });
    Ok(Some(result))
}

/// Template context: the pod with its namespace and name promoted.
fn pod_context(pod: &Pod) -> Result<Value, AnalyzeError> {
    let mut context = serde_json::to_value(pod)
        .map_err(|err| AnalyzeError::Template(format!("failed to encode pod context: {err}")))?;
    if let Value::Object(map) = &mut context {
        map.insert("namespace".to_string(), Value::String(pod.metadata.namespace.clone()));
        map.insert("name".to_string(), Value::String(pod.metadata.name.clone()));
    }
    Ok(context)
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Events decoded per namespace, read at most once per analysis.
#[derive(Default)]
struct EventCache {
    /// Namespace to decoded events.
    by_namespace: BTreeMap<String, Vec<Event>>,
}

impl EventCache {
    /// Joins the Warning event messages about `pod` with `". "`.
    fn warning_messages(
        &mut self,
        store: &dyn EvidenceStore,
        pod: &Pod,
    ) -> Result<String, AnalyzeError> {
        let namespace = &pod.metadata.namespace;
        if !self.by_namespace.contains_key(namespace) {
            let path = paths::cluster_resource_path(EVENTS_DIR, namespace);
            let mut events = Vec::new();
            for bytes in store.find_files(&path, &[])?.values() {
                events.extend(decode_object_list::<Event>("events", bytes)?);
            }
            self.by_namespace.insert(namespace.clone(), events);
        }
        let messages = self
            .by_namespace
            .get(namespace)
            .into_iter()
            .flatten()
            .filter(|event| {
                event.involved_object.kind == "Pod"
                    && event.involved_object.name == pod.metadata.name
                    && event.involved_object.namespace == pod.metadata.namespace
                    && event.kind == "Warning"
                    && !event.message.is_empty()
            })
            .map(|event| event.message.as_str())
            .collect::<Vec<_>>();
        Ok(messages.join(". "))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use serde_json::json;

    use super::*;
    use crate::runtime::store::InMemoryEvidenceStore;

    fn store() -> InMemoryEvidenceStore {
        let pods = json!({"items": [
            {"metadata": {"name": "web-0", "namespace": "app"},
             "status": {"phase": "Running",
                        "containerStatuses": [{"name": "web", "ready": true,
                                               "state": {"running": {"startedAt": "now"}}}]}},
            {"metadata": {"name": "web-1", "namespace": "app"},
             "status": {"phase": "Running",
                        "containerStatuses": [{"name": "web", "ready": false,
                                               "state": {"waiting": {"reason": "CrashLoopBackOff"}}}]}}
        ]});
        let events = json!({"items": [
            {"involvedObject": {"kind": "Pod", "name": "web-1", "namespace": "app"},
             "type": "Warning", "reason": "BackOff", "message": "Back-off restarting"},
            {"involvedObject": {"kind": "Pod", "name": "web-1", "namespace": "app"},
             "type": "Normal", "reason": "Pulled", "message": "Pulled image"}
        ]});
        InMemoryEvidenceStore::new()
            .with_file("cluster-resources/pods/app.json", pods.to_string())
            .with_file("cluster-resources/pods/kube-system.json", "[]")
            .with_file("cluster-resources/events/app.json", events.to_string())
    }

    fn spec(outcomes: Vec<Outcome>) -> ClusterPodStatusesAnalyze {
        ClusterPodStatusesAnalyze {
            outcomes,
            ..ClusterPodStatusesAnalyze::default()
        }
    }

    #[test]
    fn unhealthy_pod_gets_default_title_and_event_message() {
        let output =
            analyze_pod_statuses(&store(), &spec(vec![Outcome::fail("!= Healthy", "")])).unwrap();
        assert_eq!(output.results.len(), 1);
        let result = &output.results[0];
        assert!(result.is_fail());
        assert_eq!(result.title, "Pod app/web-1 status");
        assert_eq!(result.message, "Pod app/web-1 status is CrashLoopBackOff. Back-off restarting");
        assert_eq!(result.involved_object.as_ref().unwrap().name, "web-1");
    }

    #[test]
    fn tokens_match_reason_case_insensitively() {
        let outcomes = vec![
            Outcome::warn("== crashloopbackoff", "{{ .Name }} is crashing"),
            Outcome::pass("== Running", "ok"),
        ];
        let output = analyze_pod_statuses(&store(), &spec(outcomes)).unwrap();
        assert_eq!(output.results.len(), 2);
        assert!(output.results[0].is_pass());
        assert!(output.results[1].is_warn());
        assert_eq!(output.results[1].message, "web-1 is crashing");
    }

    #[test]
    fn namespace_filter_and_malformed_outcomes() {
        let mut spec = spec(vec![
            Outcome::default(),
            Outcome::fail("Pending", "bad"),
            Outcome::fail("> Pending", "bad"),
            Outcome::pass("", "fine"),
        ]);
        spec.namespaces = vec!["kube-system".to_string()];
        let output = analyze_pod_statuses(&store(), &spec).unwrap();
        assert!(output.results.is_empty());
        assert_eq!(output.warnings.len(), 3);
    }
}
