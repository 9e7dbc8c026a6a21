// crates/bundle-verdict-core/src/runtime/analyzers/workload.rs
// ============================================================================
// Module: Workload Status Analyzers
// Description: Deployment, StatefulSet and Job readiness checks.
// Purpose: Evaluate replica and completion counts from collected resources.
// Dependencies: crate::{core, interfaces, runtime}, serde
// ============================================================================

//! ## Overview
//! Named mode looks up one object in its namespace file and resolves the
//! outcome list against it. A missing object is decided by the first outcome:
//! an `absent` clause matches, anything else yields a default "was not found"
//! Fail. Unnamed mode walks every listed namespace and reports a default Fail
//! for each unhealthy object. A namespace file that was never collected
//! contributes nothing in either mode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzeResult;
use crate::core::AnalyzerOutput;
use crate::core::Condition;
use crate::core::Outcome;
use crate::core::Verdict;
use crate::core::kube::Job;
use crate::core::kube::Workload;
use crate::core::kube::decode_object_list;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::runtime::aggregator::ResultAggregator;
use crate::runtime::conditions::evaluate_integer;
use crate::runtime::resolver::OutcomeResolver;
use crate::runtime::resolver::Resolution;

/// When-clause sentinel matching a resource that was not collected.
pub const ABSENT: &str = "absent";

// ============================================================================
// SECTION: Spec
// ============================================================================

/// Spec shared by deployment, statefulset and job analyzers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadStatusAnalyze {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Object name; empty selects unnamed mode.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Namespace of the named object, or one namespace to scan.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Additional namespaces to scan in unnamed mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

impl WorkloadStatusAnalyze {
    /// Title for the given kind label, e.g. `Deployment`.
    #[must_use]
    pub fn title(&self, label: &str) -> String {
        if self.name.is_empty() {
            self.meta.title_or(&format!("{label} Status"))
        } else {
            self.meta.title_or(&format!("{} Status", self.name))
        }
    }

    /// Namespace of the named object.
    fn named_namespace(&self) -> &str {
        if self.namespace.is_empty() { paths::DEFAULT_NAMESPACE } else { &self.namespace }
    }

    /// Resource files scanned in unnamed mode.
    fn scan_patterns(&self, resource_dir: &str) -> Vec<String> {
        let mut patterns = Vec::new();
        if !self.namespace.is_empty() {
            patterns.push(paths::cluster_resource_path(resource_dir, &self.namespace));
        }
        for namespace in &self.namespaces {
            let path = paths::cluster_resource_path(resource_dir, namespace);
            if !patterns.contains(&path) {
                patterns.push(path);
            }
        }
        if patterns.is_empty() {
            patterns.push(paths::cluster_resource_glob(resource_dir));
        }
        patterns
    }
}

// ============================================================================
// SECTION: Workload Kinds
// ============================================================================

/// Replica-based workload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    /// `apps/v1` Deployment.
    Deployment,
    /// `apps/v1` StatefulSet.
    StatefulSet,
}

impl WorkloadKind {
    /// Collected resource directory.
    const fn resource_dir(self) -> &'static str {
        match self {
            Self::Deployment => "deployments",
            Self::StatefulSet => "statefulsets",
        }
    }

    /// Lowercase resource type used in messages.
    const fn resource_type(self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::StatefulSet => "statefulset",
        }
    }

    /// Display label used in titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
        }
    }
}

// ============================================================================
// SECTION: Deployments and StatefulSets
// ============================================================================

/// Evaluates a deployment or statefulset analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when resource files cannot be read or decoded, or
/// when a when-clause is malformed.
pub fn analyze_workload(
    store: &dyn EvidenceStore,
    spec: &WorkloadStatusAnalyze,
    kind: WorkloadKind,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let strict = spec.meta.is_strict()?;
    let mut aggregator = ResultAggregator::new();
    let what = format!("{} list", kind.resource_type());

    if spec.name.is_empty() {
        for pattern in spec.scan_patterns(kind.resource_dir()) {
            for bytes in store.find_files(&pattern, &[])?.values() {
                for workload in decode_object_list::<Workload>(&what, bytes)? {
                    if let Some(result) = unready_workload_result(&workload, kind) {
                        aggregator.push_result(result);
                    }
                }
            }
        }
        return Ok(aggregator.finish(strict));
    }

    let title = spec.title(kind.label());
    let path = paths::cluster_resource_path(kind.resource_dir(), spec.named_namespace());
    for bytes in store.find_files(&path, &[])?.values() {
        let workloads = decode_object_list::<Workload>(&what, bytes)?;
        let resolution = match workloads.iter().find(|w| w.metadata.name == spec.name) {
            Some(workload) => {
                let ready = workload.status.ready_replicas;
                OutcomeResolver::new(&title, &spec.outcomes).resolve(
                    aggregator.warnings(),
                    |_, when| {
                        if when == ABSENT { Ok(false) } else { compare_count(when, ready) }
                    },
                )?
            }
            None => resolve_missing(&title, &spec.outcomes, kind.resource_type(), &spec.name),
        };
        aggregator.push_result(resolution.into_result());
    }
    Ok(aggregator.finish(strict))
}

/// Default Fail for a workload with fewer ready than desired replicas.
fn unready_workload_result(workload: &Workload, kind: WorkloadKind) -> Option<AnalyzeResult> {
    let ready = workload.status.ready_replicas;
    let desired = workload.desired_replicas();
    if ready >= desired {
        return None;
    }
    let object = format!("{}/{}", workload.metadata.namespace, workload.metadata.name);
    Some(AnalyzeResult::with_message(
        format!("{object} {} Status", kind.label()),
        Verdict::Fail,
        format!("The {} {object} has {ready}/{desired} replicas", kind.resource_type()),
    ))
}

/// Resolves the outcome list against a resource that was not collected.
fn resolve_missing(
    title: &str,
    outcomes: &[Outcome],
    resource_type: &str,
    name: &str,
) -> Resolution {
    let Some((verdict, single)) = outcomes.iter().find_map(Outcome::verdict) else {
        return Resolution::Exhausted {
            title: title.to_string(),
        };
    };
    if single.when.trim() == ABSENT {
        return Resolution::Matched(AnalyzeResult::matched(title, verdict, single));
    }
    let mut result = AnalyzeResult::with_message(
        title,
        Verdict::Fail,
        format!("The {resource_type} \"{name}\" was not found"),
    );
    result.uri.clone_from(&single.uri);
    Resolution::Matched(result)
}

/// Compares a count against an `op n` clause.
fn compare_count(when: &str, actual: i32) -> Result<bool, AnalyzeError> {
    let condition = Condition::parse_unselected(when)?;
    evaluate_integer(condition.operator, &condition.operand, i64::from(actual))
}

// ============================================================================
// SECTION: Jobs
// ============================================================================

/// Collected resource directory for jobs.
const JOBS_DIR: &str = "jobs";

/// Evaluates a job analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when resource files cannot be read or decoded, or
/// when a when-clause is malformed.
pub fn analyze_job(
    store: &dyn EvidenceStore,
    spec: &WorkloadStatusAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let strict = spec.meta.is_strict()?;
    let mut aggregator = ResultAggregator::new();

    if spec.name.is_empty() {
        for pattern in spec.scan_patterns(JOBS_DIR) {
            for bytes in store.find_files(&pattern, &[])?.values() {
                for job in decode_object_list::<Job>("job list", bytes)? {
                    if let Some(result) = incomplete_job_result(&job) {
                        aggregator.push_result(result);
                    }
                }
            }
        }
        return Ok(aggregator.finish(strict));
    }

    let path = paths::cluster_resource_path(JOBS_DIR, spec.named_namespace());
    for bytes in store.find_files(&path, &[])?.values() {
        let jobs = decode_object_list::<Job>("job list", bytes)?;
        let Some(job) = jobs.iter().find(|job| job.metadata.name == spec.name) else {
            aggregator.push_result(AnalyzeResult::with_message(
                format!("{} Job Status", spec.name),
                Verdict::Fail,
                format!("The job \"{}\" was not found", spec.name),
            ));
            continue;
        };
        if spec.outcomes.is_empty() {
            if let Some(result) = incomplete_job_result(job) {
                aggregator.push_result(result);
            }
            continue;
        }
        let title = spec.title("Job");
        let resolution = OutcomeResolver::new(&title, &spec.outcomes)
            .resolve(aggregator.warnings(), |_, when| compare_job(when, job))?;
        aggregator.push_result(resolution.into_result());
    }
    Ok(aggregator.finish(strict))
}

/// Default Fail for a job that has failures and has not completed.
fn incomplete_job_result(job: &Job) -> Option<AnalyzeResult> {
    let succeeded = job.status.succeeded;
    let complete = match job.spec.completions {
        None => succeeded > 1,
        Some(completions) => completions == succeeded,
    };
    if complete || job.status.failed == 0 {
        return None;
    }
    let object = format!("{}/{}", job.metadata.namespace, job.metadata.name);
    Some(AnalyzeResult::with_message(
        format!("{object} Job Status"),
        Verdict::Fail,
        format!("The job {object} is not complete"),
    ))
}

/// Evaluates `succeeded|failed op n` against a job.
fn compare_job(when: &str, job: &Job) -> Result<bool, AnalyzeError> {
    let (selector, operator, operand) = Condition::parse_selected(when)?;
    let actual = match selector.as_str() {
        "succeeded" => job.status.succeeded,
        "failed" => job.status.failed,
        other => {
            return Err(AnalyzeError::ConditionParse(format!("unknown job selector '{other}'")));
        }
    };
    evaluate_integer(operator, &operand, i64::from(actual))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
