// crates/bundle-verdict-core/src/runtime/analyzers/compare.rs
// ============================================================================
// Module: Structural Compare Analyzers
// Description: `yamlCompare` and `jsonCompare` over collected documents.
// Purpose: Compare a collected document (or a slice of it) to an expected value.
// Dependencies: crate::{core, interfaces, runtime}, serde, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! Both analyzers read `<collectorName>/<fileName>`, optionally select a
//! sub-document, and compare it to `value` parsed in the same format. Each
//! outcome's `when` is the expected equality; an empty clause defaults to
//! `false` for Fail and Warn and `true` for Pass. YAML documents compare
//! strictly, JSON documents ignore the order of top-level arrays. When no
//! outcome matches the analyzer reports an "Invalid analyzer" failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzeResult;
use crate::core::AnalyzerOutput;
use crate::core::Outcome;
use crate::core::Verdict;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::runtime::aggregator::ResultAggregator;
use crate::runtime::conditions::equal_ignoring_order;
use crate::runtime::conditions::parse_when_bool;
use crate::runtime::conditions::select_json_path;
use crate::runtime::conditions::select_path;
use crate::runtime::conditions::values_equal;
use crate::runtime::resolver::EmptyWhen;
use crate::runtime::resolver::OutcomeResolver;
use crate::runtime::resolver::Resolution;

// ============================================================================
// SECTION: Specs
// ============================================================================

/// Default `yamlCompare` title.
pub const YAML_COMPARE_TITLE: &str = "YAML Compare";
/// Default `jsonCompare` title.
pub const JSON_COMPARE_TITLE: &str = "JSON Compare";
/// Message of the failure reported when no outcome matched.
pub const INVALID_ANALYZER_MESSAGE: &str = "Invalid analyzer";

/// `yamlCompare` analyzer spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YamlCompareAnalyze {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Collector directory.
    pub collector_name: String,
    /// File within the collector directory.
    pub file_name: String,
    /// Dotted selector applied before comparing.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Expected document, as YAML.
    pub value: String,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

/// `jsonCompare` analyzer spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonCompareAnalyze {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Collector directory.
    pub collector_name: String,
    /// File within the collector directory.
    pub file_name: String,
    /// Dotted selector applied before comparing; wins over `jsonPath`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// JSONPath selector applied before comparing.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub json_path: String,
    /// Expected document, as JSON.
    pub value: String,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

impl YamlCompareAnalyze {
    /// Check name, then collector name, then `YAML Compare`.
    #[must_use]
    pub fn title(&self) -> String {
        compare_title(&self.meta, &self.collector_name, YAML_COMPARE_TITLE)
    }
}

impl JsonCompareAnalyze {
    /// Check name, then collector name, then `JSON Compare`.
    #[must_use]
    pub fn title(&self) -> String {
        compare_title(&self.meta, &self.collector_name, JSON_COMPARE_TITLE)
    }
}

/// Shared title fallback chain.
fn compare_title(meta: &AnalyzeMeta, collector_name: &str, default: &str) -> String {
    if collector_name.is_empty() {
        meta.title_or(default)
    } else {
        meta.title_or(collector_name)
    }
}

// ============================================================================
// SECTION: Analysis
// ============================================================================

/// Evaluates a `yamlCompare` analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when the file is missing, either document does
/// not parse, the path does not resolve, or a when-clause is not boolean.
pub fn analyze_yaml_compare(
    store: &dyn EvidenceStore,
    spec: &YamlCompareAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let strict = spec.meta.is_strict()?;
    let full_path = paths::join(&spec.collector_name, &spec.file_name);
    let bytes = store.get_file(&full_path)?;
    let document: Value = serde_yaml::from_slice(&bytes).map_err(|err| {
        AnalyzeError::Decode(format!("'{full_path}' is not a yaml document: {err}"))
    })?;
    let actual = select_path(&document, &spec.path)?;
    let expected: Value = serde_yaml::from_str(&spec.value).map_err(|err| {
        AnalyzeError::Invalid(format!("expected value is not a yaml document: {err}"))
    })?;
    let equal = values_equal(&actual, &expected);
    resolve_compare(&spec.title(), &spec.outcomes, equal, strict)
}

/// Evaluates a `jsonCompare` analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when the file is missing, either document does
/// not parse, a selector fails, or a when-clause is not boolean.
pub fn analyze_json_compare(
    store: &dyn EvidenceStore,
    spec: &JsonCompareAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let strict = spec.meta.is_strict()?;
    let full_path = paths::join(&spec.collector_name, &spec.file_name);
    let bytes = store.get_file(&full_path)?;
    let document: Value = serde_json::from_slice(&bytes).map_err(|err| {
        AnalyzeError::Decode(format!("'{full_path}' is not a json document: {err}"))
    })?;
    let actual = if !spec.path.trim().is_empty() {
        select_path(&document, &spec.path)?
    } else if !spec.json_path.trim().is_empty() {
        select_json_path(&document, &spec.json_path)?
    } else {
        document
    };
    let expected: Value = serde_json::from_str(&spec.value).map_err(|err| {
        AnalyzeError::Invalid(format!("expected value is not a json document: {err}"))
    })?;
    let equal = equal_ignoring_order(&actual, &expected);
    resolve_compare(&spec.title(), &spec.outcomes, equal, strict)
}

/// Resolves the outcome list against the equality flag.
fn resolve_compare(
    title: &str,
    outcomes: &[Outcome],
    equal: bool,
    strict: bool,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let mut aggregator = ResultAggregator::new();
    let resolution = OutcomeResolver::new(title, outcomes)
        .with_empty_when(EmptyWhen::Evaluate)
        .resolve(aggregator.warnings(), |verdict, when| {
            let expected = if when.is_empty() {
                verdict == Verdict::Pass
            } else {
                parse_when_bool(when)?
            };
            Ok(expected == equal)
        })?;
    let result = match resolution {
        Resolution::Matched(result) => result,
        Resolution::Exhausted {
            title,
        } => AnalyzeResult::with_message(title, Verdict::Fail, INVALID_ANALYZER_MESSAGE),
    };
    aggregator.push_result(result);
    Ok(aggregator.finish(strict))
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

    use super::*;
    use crate::runtime::store::InMemoryEvidenceStore;

    fn store() -> InMemoryEvidenceStore {
        InMemoryEvidenceStore::new()
            .with_file(
                "config/app.yaml",
                "server:\n  replicas: 3\n  zones: [a, b]\nmode: ha\n",
            )
            .with_file(
                "config/app.json",
                r#"{"spec": {"ports": [443, 80], "tls": true}, "items": [{"name": "b"}, {"name": "a"}]}"#,
            )
    }

    fn yaml(path: &str, value: &str, outcomes: Vec<Outcome>) -> YamlCompareAnalyze {
        YamlCompareAnalyze {
            collector_name: "config".to_string(),
            file_name: "app.yaml".to_string(),
            path: path.to_string(),
            value: value.to_string(),
            outcomes,
            ..YamlCompareAnalyze::default()
        }
    }

    fn json(path: &str, json_path: &str, value: &str) -> JsonCompareAnalyze {
        JsonCompareAnalyze {
            collector_name: "config".to_string(),
            file_name: "app.json".to_string(),
            path: path.to_string(),
            json_path: json_path.to_string(),
            value: value.to_string(),
            outcomes: vec![Outcome::fail("", "differs"), Outcome::pass("", "matches")],
            ..JsonCompareAnalyze::default()
        }
    }

    #[test]
    fn yaml_path_selection_and_default_clauses() {
        let spec = yaml(
            "server.replicas",
            "3",
            vec![Outcome::fail("", "differs"), Outcome::pass("", "matches")],
        );
        let output = analyze_yaml_compare(&store(), &spec).unwrap();
        assert!(output.results[0].is_pass());
        assert_eq!(output.results[0].title, "config");
    }

    #[test]
    fn yaml_arrays_are_order_sensitive() {
        let spec = yaml(
            "server.zones",
            "[b, a]",
            vec![Outcome::fail("false", "differs"), Outcome::pass("true", "matches")],
        );
        let output = analyze_yaml_compare(&store(), &spec).unwrap();
        assert!(output.results[0].is_fail());
    }

    #[test]
    fn json_arrays_ignore_order() {
        let output =
            analyze_json_compare(&store(), &json("spec.ports", "", "[80, 443]")).unwrap();
        assert!(output.results[0].is_pass());
    }

    #[test]
    fn json_path_unwraps_single_match() {
        let output =
            analyze_json_compare(&store(), &json("", "{.spec.tls}", "true")).unwrap();
        assert!(output.results[0].is_pass());
        let names =
            analyze_json_compare(&store(), &json("", "$.items[*].name", r#"["a","b"]"#)).unwrap();
        assert!(names.results[0].is_pass());
    }

    #[test]
    fn exhausted_outcomes_fail_as_invalid() {
        let spec = yaml("mode", "ha", vec![Outcome::warn("false", "differs")]);
        let output = analyze_yaml_compare(&store(), &spec).unwrap();
        assert!(output.results[0].is_fail());
        assert_eq!(output.results[0].message, INVALID_ANALYZER_MESSAGE);
    }

    #[test]
    fn bad_paths_and_clauses_are_errors() {
        let unresolved = yaml("server.missing", "1", vec![Outcome::pass("", "x")]);
        assert!(matches!(analyze_yaml_compare(&store(), &unresolved), Err(AnalyzeError::Invalid(_))));
        let bad_when = yaml("mode", "ha", vec![Outcome::pass("sometimes", "x")]);
        assert!(matches!(
            analyze_yaml_compare(&store(), &bad_when),
            Err(AnalyzeError::ConditionParse(_))
        ));
        let mut missing = json("", "", "{}");
        missing.file_name = "absent.json".to_string();
        assert!(matches!(analyze_json_compare(&store(), &missing), Err(AnalyzeError::NotFound(_))));
    }

    #[test]
    fn title_prefers_check_name() {
        let mut spec = json("", "", "{}");
        spec.collector_name = String::new();
        assert_eq!(spec.title(), JSON_COMPARE_TITLE);
        spec.meta.check_name = "Ports".to_string();
        assert_eq!(spec.title(), "Ports");
    }
}
