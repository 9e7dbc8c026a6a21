// crates/bundle-verdict-core/src/runtime/analyzers/host.rs
// ============================================================================
// Module: Host Fact Analyzers
// Description: Memory, OS, CPU, time, sysctl, service and disk checks.
// Purpose: Evaluate host facts locally or once per remote node.
// Dependencies: crate::{core, interfaces, runtime}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every host analyzer resolves its fact through the fan-out resolver, decodes
//! one record per collected artifact and runs the outcome list against it.
//! Remote artifacts get a `" - Node <name>"` title suffix. Disk usage is the
//! exception: it is read from a single local artifact named after the
//! collector.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzeResult;
use crate::core::AnalyzerOutput;
use crate::core::CollectedContent;
use crate::core::ComparisonOperator;
use crate::core::Condition;
use crate::core::CpuInfo;
use crate::core::DiskUsageInfo;
use crate::core::HostOsInfo;
use crate::core::MemoryInfo;
use crate::core::Outcome;
use crate::core::ServiceInfo;
use crate::core::TimeInfo;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::runtime::aggregator::ResultAggregator;
use crate::runtime::aggregator::node_title;
use crate::runtime::conditions::evaluate_exact;
use crate::runtime::conditions::evaluate_integer;
use crate::runtime::conditions::evaluate_platform;
use crate::runtime::conditions::evaluate_quantity;
use crate::runtime::conditions::evaluate_token;
use crate::runtime::conditions::numeric::parse_integer;
use crate::runtime::conditions::quantity::compare_quantity;
use crate::runtime::fanout::FanoutPaths;
use crate::runtime::fanout::retrieve_collected_contents;
use crate::runtime::resolver::OutcomeResolver;
use crate::runtime::template::MissingField;
use crate::runtime::template::render_with;

// ============================================================================
// SECTION: Titles
// ============================================================================

/// Default title of the memory analyzer.
pub const MEMORY_TITLE: &str = "Amount of Memory";
/// Default title of the OS analyzer.
pub const OS_TITLE: &str = "Host OS Info";
/// Default title of the CPU analyzer.
pub const CPU_TITLE: &str = "Number of CPUs";
/// Default title of the time analyzer.
pub const TIME_TITLE: &str = "Time";
/// Default title of the sysctl analyzer.
pub const SYSCTL_TITLE: &str = "Sysctl";
/// Default title of the services analyzer.
pub const SERVICES_TITLE: &str = "Host Services";
/// Collector name used when a disk usage analyzer names none.
const DEFAULT_DISK_USAGE_COLLECTOR: &str = "diskUsage";

// ============================================================================
// SECTION: Spec
// ============================================================================

/// Spec shared by host fact analyzers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostAnalyze {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Collector that produced the fact.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub collector_name: String,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

impl HostAnalyze {
    /// Title of a disk usage analyzer.
    #[must_use]
    pub fn disk_usage_title(&self) -> String {
        if self.collector_name.is_empty() {
            self.meta.title_or("Disk Usage")
        } else {
            self.meta.title_or(&format!("Disk Usage {}", self.collector_name))
        }
    }
}

// ============================================================================
// SECTION: Shared Evaluation
// ============================================================================

/// Resolves outcomes once per collected artifact.
fn analyze_contents<T, C, D>(
    spec: &HostAnalyze,
    title: &str,
    contents: &[CollectedContent],
    what: &str,
    mut check: C,
    mut decorate: D,
) -> Result<AnalyzerOutput, AnalyzeError>
where
    T: DeserializeOwned,
    C: FnMut(&T, &str) -> Result<bool, AnalyzeError>,
    D: FnMut(&T, &mut AnalyzeResult) -> Result<(), AnalyzeError>,
{
    let strict = spec.meta.is_strict()?;
    let mut aggregator = ResultAggregator::new();
    for content in contents {
        let fact: T = content.decode(what)?;
        let unit_title = node_title(title, content);
        let resolution = OutcomeResolver::new(&unit_title, &spec.outcomes)
            .resolve(aggregator.warnings(), |_, when| check(&fact, when))?;
        if let Some(mut result) = resolution.matched() {
            decorate(&fact, &mut result)?;
            aggregator.push_result(result);
        }
    }
    Ok(aggregator.finish(strict))
}

/// Fans out over a standard host fact and resolves each artifact.
fn analyze_host_fact<T, C>(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
    default_title: &str,
    file_name: &str,
    what: &str,
    check: C,
) -> Result<AnalyzerOutput, AnalyzeError>
where
    T: DeserializeOwned,
    C: FnMut(&T, &str) -> Result<bool, AnalyzeError>,
{
    let local_path = paths::host_fact_path(file_name);
    let contents =
        retrieve_collected_contents(store, FanoutPaths::host_fact(&local_path, file_name))?;
    let title = spec.meta.title_or(default_title);
    analyze_contents(spec, &title, &contents, what, check, |_: &T, _| Ok(()))
}

// ============================================================================
// SECTION: Memory
// ============================================================================

/// Evaluates `op quantity` clauses against total memory.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when evidence cannot be resolved or a clause is
/// malformed.
pub fn analyze_memory(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    analyze_host_fact(
        store,
        spec,
        MEMORY_TITLE,
        paths::HOST_MEMORY_FILE,
        "memory info",
        |info: &MemoryInfo, when| evaluate_quantity(when, info.total),
    )
}

// ============================================================================
// SECTION: Operating System
// ============================================================================

/// Evaluates platform-qualified version clauses against OS facts.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when evidence cannot be resolved or a clause is
/// malformed.
pub fn analyze_os(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    analyze_host_fact(
        store,
        spec,
        OS_TITLE,
        paths::HOST_OS_INFO_FILE,
        "host os info",
        |info: &HostOsInfo, when| evaluate_platform(when, info),
    )
}

// ============================================================================
// SECTION: CPU
// ============================================================================

/// Flags required by `x86-64-v2` on top of the baseline.
const X86_64_V2_FLAGS: &[&str] = &["cx16", "lahf_lm", "popcnt", "sse4_1", "sse4_2", "ssse3"];
/// Flags required by `x86-64-v3` on top of `x86-64-v2`.
const X86_64_V3_FLAGS: &[&str] =
    &["avx", "avx2", "bmi1", "bmi2", "f16c", "fma", "abm", "movbe", "xsave"];
/// Flags required by `x86-64-v4` on top of `x86-64-v3`.
const X86_64_V4_FLAGS: &[&str] = &["avx512f", "avx512bw", "avx512cd", "avx512dq", "avx512vl"];

/// Evaluates count, architecture and feature clauses against CPU facts.
///
/// Messages are rendered with `{{ .Info.MachineArch }}` available; other
/// fields render empty.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when evidence cannot be resolved, a clause is
/// malformed or a message template fails to render.
pub fn analyze_cpu(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let local_path = paths::host_fact_path(paths::HOST_CPU_FILE);
    let contents = retrieve_collected_contents(
        store,
        FanoutPaths::host_fact(&local_path, paths::HOST_CPU_FILE),
    )?;
    let title = spec.meta.title_or(CPU_TITLE);
    analyze_contents(
        spec,
        &title,
        &contents,
        "cpu info",
        |info: &CpuInfo, when| evaluate_cpu(when, info),
        |info: &CpuInfo, result| {
            let context = json!({"Info": {"MachineArch": info.machine_arch}});
            result.message = render_with(&result.message, &context, MissingField::Empty)?;
            Ok(())
        },
    )
}

/// Evaluates one CPU clause.
fn evaluate_cpu(when: &str, info: &CpuInfo) -> Result<bool, AnalyzeError> {
    let tokens = when.split_whitespace().collect::<Vec<_>>();
    let largest = info.logical_count.max(info.physical_count);
    match tokens.as_slice() {
        [verb, operand] if verb.eq_ignore_ascii_case("supports") => {
            supports_microarchitecture(operand, &info.flags)
        }
        [verb, operand] if verb.eq_ignore_ascii_case("hasFlags") => {
            Ok(has_flags(operand.split(','), &info.flags))
        }
        [operator, operand] => compare_count(operator, operand, largest),
        [selector, operator, operand] => match selector.to_ascii_lowercase().as_str() {
            "logical" => compare_count(operator, operand, info.logical_count),
            "physical" => compare_count(operator, operand, info.physical_count),
            "count" => compare_count(operator, operand, largest),
            "machinearch" => {
                evaluate_token(ComparisonOperator::parse(operator)?, &info.machine_arch, operand)
            }
            _ => Err(AnalyzeError::ConditionParse(format!("unknown cpu selector '{selector}'"))),
        },
        _ => Err(AnalyzeError::ConditionParse(format!("unable to parse cpu condition '{when}'"))),
    }
}

/// Compares a CPU count against an integer operand.
fn compare_count(operator: &str, operand: &str, actual: u64) -> Result<bool, AnalyzeError> {
    let actual = i64::try_from(actual).unwrap_or(i64::MAX);
    evaluate_integer(ComparisonOperator::parse(operator)?, operand, actual)
}

/// Returns true when every named flag is present.
fn has_flags<'a>(mut wanted: impl Iterator<Item = &'a str>, flags: &[String]) -> bool {
    wanted.all(|flag| flag.is_empty() || flags.iter().any(|present| present == flag))
}

/// Returns true when the CPU carries every flag of the microarchitecture level.
fn supports_microarchitecture(level: &str, flags: &[String]) -> Result<bool, AnalyzeError> {
    let required: &[&[&str]] = match level {
        "x86-64" => &[],
        "x86-64-v2" => &[X86_64_V2_FLAGS],
        "x86-64-v3" => &[X86_64_V2_FLAGS, X86_64_V3_FLAGS],
        "x86-64-v4" => &[X86_64_V2_FLAGS, X86_64_V3_FLAGS, X86_64_V4_FLAGS],
        other => {
            return Err(AnalyzeError::ConditionParse(format!(
                "unknown microarchitecture '{other}'"
            )));
        }
    };
    Ok(required.iter().all(|set| has_flags(set.iter().copied(), flags)))
}

// ============================================================================
// SECTION: Time
// ============================================================================

/// Evaluates timezone and NTP clauses against time facts.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when evidence cannot be resolved or a clause is
/// malformed.
pub fn analyze_time(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    analyze_host_fact(
        store,
        spec,
        TIME_TITLE,
        paths::HOST_TIME_FILE,
        "time info",
        |info: &TimeInfo, when| evaluate_time(when, info),
    )
}

/// Evaluates one time clause.
fn evaluate_time(when: &str, info: &TimeInfo) -> Result<bool, AnalyzeError> {
    let (selector, operator, operand) = Condition::parse_selected(when)?;
    match selector.as_str() {
        "timezone" => evaluate_exact(operator, &info.timezone, &operand),
        "ntp" => {
            if !matches!(
                operand.as_str(),
                "synchronized+active"
                    | "synchronized+inactive"
                    | "unsynchronized+active"
                    | "unsynchronized+inactive"
            ) {
                return Err(AnalyzeError::ConditionParse(format!("unknown ntp state '{operand}'")));
            }
            let synchronized =
                if info.ntp_synchronized { "synchronized" } else { "unsynchronized" };
            let active = if info.ntp_active { "active" } else { "inactive" };
            evaluate_exact(operator, &format!("{synchronized}+{active}"), &operand)
        }
        other => Err(AnalyzeError::ConditionParse(format!("unknown time selector '{other}'"))),
    }
}

// ============================================================================
// SECTION: Sysctl
// ============================================================================

/// Evaluates `param op value` clauses against kernel parameters.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when evidence cannot be resolved, a clause is
/// malformed or the parameter was not collected.
pub fn analyze_sysctl(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    analyze_host_fact(
        store,
        spec,
        SYSCTL_TITLE,
        paths::HOST_SYSCTL_FILE,
        "sysctl parameters",
        |params: &BTreeMap<String, String>, when| evaluate_sysctl(when, params),
    )
}

/// Evaluates one sysctl clause.
fn evaluate_sysctl(when: &str, params: &BTreeMap<String, String>) -> Result<bool, AnalyzeError> {
    let (param, operator, expected) = Condition::parse_selected(when)?;
    let actual = params
        .get(&param)
        .ok_or_else(|| AnalyzeError::Invalid(format!("sysctl parameter '{param}' not collected")))?
        .trim();
    if operator.is_equality() {
        return evaluate_exact(operator, actual, &expected);
    }
    let actual = parse_integer(actual)?;
    evaluate_integer(operator, &expected, actual)
}

// ============================================================================
// SECTION: Services
// ============================================================================

/// Evaluates `unit op active[,sub[,load]]` clauses against systemd units.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when evidence cannot be resolved or a clause is
/// malformed.
pub fn analyze_services(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    analyze_host_fact(
        store,
        spec,
        SERVICES_TITLE,
        paths::HOST_SERVICES_FILE,
        "service info",
        |services: &Vec<ServiceInfo>, when| evaluate_services(when, services),
    )
}

/// Evaluates one service clause against the first matching unit.
fn evaluate_services(when: &str, services: &[ServiceInfo]) -> Result<bool, AnalyzeError> {
    let (unit, operator, states) = Condition::parse_selected(when)?;
    if !operator.is_equality() {
        return Err(AnalyzeError::ConditionParse(format!(
            "operator {operator} is not supported for services"
        )));
    }
    let mut wanted = states.split(',');
    let active = wanted.next().unwrap_or_default();
    let sub = wanted.next().unwrap_or_default();
    let load = wanted.next().unwrap_or_default();

    let Some(service) = services.iter().find(|service| service.unit.starts_with(&unit)) else {
        return Ok(false);
    };
    let checks = [(active, &service.active), (sub, &service.sub), (load, &service.load)];
    let mut constrained =
        checks.iter().filter(|(wanted, _)| !wanted.is_empty() && *wanted != "*");
    if operator == ComparisonOperator::Equal {
        Ok(constrained.all(|(wanted, actual)| *wanted == actual.as_str()))
    } else {
        Ok(constrained.any(|(wanted, actual)| *wanted != actual.as_str()))
    }
}

// ============================================================================
// SECTION: Disk Usage
// ============================================================================

/// Evaluates capacity clauses against the local disk usage artifact.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when the artifact is missing or undecodable, or a
/// clause is malformed.
pub fn analyze_disk_usage(
    store: &dyn EvidenceStore,
    spec: &HostAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let collector = if spec.collector_name.is_empty() {
        DEFAULT_DISK_USAGE_COLLECTOR
    } else {
        spec.collector_name.as_str()
    };
    let path = format!("{}/{collector}.json", paths::HOST_DISK_USAGE_DIR);
    let contents = vec![CollectedContent::local(store.get_file(&path)?)];
    let title = spec.disk_usage_title();
    analyze_contents(
        spec,
        &title,
        &contents,
        "disk usage info",
        |info: &DiskUsageInfo, when| evaluate_disk_usage(when, info),
        |_: &DiskUsageInfo, _| Ok(()),
    )
}

/// Evaluates one disk usage clause.
fn evaluate_disk_usage(when: &str, info: &DiskUsageInfo) -> Result<bool, AnalyzeError> {
    let (stat, operator, operand) = Condition::parse_selected(when)?;
    let available = info.total_bytes.saturating_sub(info.used_bytes);
    match stat.to_ascii_lowercase().as_str() {
        "total" => compare_quantity(operator, &operand, info.total_bytes),
        "used" => compare_quantity(operator, &operand, info.used_bytes),
        "available" => compare_quantity(operator, &operand, available),
        "used/total" => compare_ratio(operator, &operand, info.used_bytes, info.total_bytes),
        "available/total" => compare_ratio(operator, &operand, available, info.total_bytes),
        other => Err(AnalyzeError::ConditionParse(format!("unknown disk usage stat '{other}'"))),
    }
}

/// Compares `part / total` against a ratio or percentage operand.
#[allow(clippy::cast_precision_loss, reason = "Disk ratios tolerate f64 rounding.")]
fn compare_ratio(
    operator: ComparisonOperator,
    operand: &str,
    part: u64,
    total: u64,
) -> Result<bool, AnalyzeError> {
    let expected = parse_ratio(operand)?;
    let actual = if total == 0 { 0.0 } else { part as f64 / total as f64 };
    let ordering = actual.partial_cmp(&expected).unwrap_or(Ordering::Equal);
    Ok(operator.holds(ordering))
}

/// Parses `0.25` or `25%`.
fn parse_ratio(operand: &str) -> Result<f64, AnalyzeError> {
    let invalid = || AnalyzeError::ConditionParse(format!("invalid ratio '{operand}'"));
    let value = match operand.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().map_err(|_| invalid())? / 100.0,
        None => operand.trim().parse::<f64>().map_err(|_| invalid())?,
    };
    if value.is_finite() { Ok(value) } else { Err(invalid()) }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
