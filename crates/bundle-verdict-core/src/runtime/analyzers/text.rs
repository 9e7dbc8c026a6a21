// crates/bundle-verdict-core/src/runtime/analyzers/text.rs
// ============================================================================
// Module: Text Analyzer
// Description: Regex checks over collected text files.
// Purpose: Evaluate `textAnalyze` patterns and named capture groups.
// Dependencies: crate::{core, interfaces, runtime}, regex, serde, serde_json
// ============================================================================

//! ## Overview
//! Every file matching `<collectorName>/<fileName>` (minus `excludeFiles`)
//! yields one result per configured mode:
//! - `regex`: the last Pass and last Fail outcome form a binary check. Fail's
//!   `when` defaults to `false` and Pass's to `true`; the file passes when
//!   "pattern matched" equals Pass's `when`.
//! - `regexGroups`: named captures of the first match are compared with
//!   `name op value` clauses and substituted into the outcome message.
//!   Without a match no clause holds; every named group still renders, as
//!   an empty string when it captured nothing.
//!
//! No matching file is a "No matching files" warning unless
//! `ignoreIfNoFiles` is set; no result at all is an "Invalid analyzer" fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzeResult;
use crate::core::AnalyzerOutput;
use crate::core::ComparisonOperator;
use crate::core::Condition;
use crate::core::Outcome;
use crate::core::SingleOutcome;
use crate::core::Verdict;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::runtime::aggregator::ResultAggregator;
use crate::runtime::analyzers::compare::INVALID_ANALYZER_MESSAGE;
use crate::runtime::conditions::evaluate_exact;
use crate::runtime::conditions::parse_when_bool;
use crate::runtime::resolver::OutcomeResolver;
use crate::runtime::template::MissingField;
use crate::runtime::template::render_with;

// ============================================================================
// SECTION: Spec
// ============================================================================

/// Default analyzer title.
pub const TEXT_ANALYZE_TITLE: &str = "Text Analyze";
/// Message of the warning reported when no file matched.
pub const NO_MATCHING_FILES_MESSAGE: &str = "No matching files";

/// `textAnalyze` analyzer spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnalyzeSpec {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Collector directory.
    pub collector_name: String,
    /// File glob within the collector directory.
    pub file_name: String,
    /// Globs within the collector directory to skip.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_files: Vec<String>,
    /// Pattern for the pass/fail mode.
    #[serde(rename = "regex", skip_serializing_if = "String::is_empty")]
    pub regex_pattern: String,
    /// Pattern with named groups for the capture mode.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub regex_groups: String,
    /// Report nothing when no file matched.
    pub ignore_if_no_files: bool,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

impl TextAnalyzeSpec {
    /// Check name, then collector name, then `Text Analyze`.
    #[must_use]
    pub fn title(&self) -> String {
        if self.collector_name.is_empty() {
            self.meta.title_or(TEXT_ANALYZE_TITLE)
        } else {
            self.meta.title_or(&self.collector_name)
        }
    }
}

// ============================================================================
// SECTION: Analysis
// ============================================================================

/// Evaluates a `textAnalyze` analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError`] when a pattern does not compile, the store
/// fails, the Pass and Fail clauses of the regex mode agree, a group clause
/// is malformed, or a message template does not render.
pub fn analyze_text(
    store: &dyn EvidenceStore,
    spec: &TextAnalyzeSpec,
) -> Result<AnalyzerOutput, AnalyzeError> {
    let strict = spec.meta.is_strict()?;
    let title = spec.title();
    let pattern_mode = compile(&spec.regex_pattern)?;
    let groups_mode = compile(&spec.regex_groups)?;

    let pattern = paths::join(&spec.collector_name, &spec.file_name);
    let exclude: Vec<String> = spec
        .exclude_files
        .iter()
        .map(|file| paths::join(&spec.collector_name, file))
        .collect();
    let files = store.find_files(&pattern, &exclude)?;

    let mut aggregator = ResultAggregator::new();
    if files.is_empty() {
        if !spec.ignore_if_no_files {
            aggregator.push_result(AnalyzeResult::with_message(
                title,
                Verdict::Warn,
                NO_MATCHING_FILES_MESSAGE,
            ));
        }
        return Ok(aggregator.finish(strict));
    }

    if let Some(regex) = &pattern_mode {
        let check = PatternCheck::from_outcomes(&spec.outcomes)?;
        for contents in files.values() {
            let text = String::from_utf8_lossy(contents);
            aggregator.push_result(check.evaluate(&title, regex.is_match(&text)));
        }
    }
    if let Some(regex) = &groups_mode {
        for contents in files.values() {
            let text = String::from_utf8_lossy(contents);
            let captures = named_captures(regex, &text);
            let resolution = OutcomeResolver::new(&title, &spec.outcomes)
                .resolve(aggregator.warnings(), |_, when| compare_capture(when, &captures))?;
            let mut result = resolution.into_result();
            if result.verdict.is_some() {
                let context = captures_context(regex, &captures);
                result.message = render_with(&result.message, &context, MissingField::Empty)?;
            }
            aggregator.push_result(result);
        }
    }

    if aggregator.is_empty() {
        aggregator.push_result(AnalyzeResult::with_message(
            title,
            Verdict::Fail,
            INVALID_ANALYZER_MESSAGE,
        ));
    }
    Ok(aggregator.finish(strict))
}

/// Compiles a non-empty pattern.
fn compile(pattern: &str) -> Result<Option<Regex>, AnalyzeError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|err| AnalyzeError::Invalid(format!("failed to compile regex '{pattern}': {err}")))
}

// ============================================================================
// SECTION: Pattern Mode
// ============================================================================

/// Binary pass/fail check derived from the outcome list.
struct PatternCheck<'a> {
    /// Last Pass outcome.
    pass: Option<&'a SingleOutcome>,
    /// Last Fail outcome.
    fail: Option<&'a SingleOutcome>,
    /// Match state that passes.
    pass_when: bool,
}

impl<'a> PatternCheck<'a> {
    /// Picks the last Pass and Fail outcomes and validates their clauses.
    fn from_outcomes(outcomes: &'a [Outcome]) -> Result<Self, AnalyzeError> {
        let pass = outcomes.iter().rev().find_map(|outcome| outcome.pass.as_ref());
        let fail = outcomes.iter().rev().find_map(|outcome| outcome.fail.as_ref());
        let pass_when = clause_or(pass, true)?;
        let fail_when = clause_or(fail, false)?;
        if pass_when == fail_when {
            return Err(AnalyzeError::Invalid(
                "pass and fail outcomes share the same when condition".to_string(),
            ));
        }
        Ok(Self {
            pass,
            fail,
            pass_when,
        })
    }

    /// Builds the result for one file.
    fn evaluate(&self, title: &str, matched: bool) -> AnalyzeResult {
        let (verdict, outcome) = if matched == self.pass_when {
            (Verdict::Pass, self.pass)
        } else {
            (Verdict::Fail, self.fail)
        };
        outcome.map_or_else(
            || AnalyzeResult::with_message(title, verdict, String::new()),
            |outcome| AnalyzeResult::matched(title, verdict, outcome),
        )
    }
}

/// Parses an outcome's boolean clause, defaulting when absent or empty.
fn clause_or(outcome: Option<&SingleOutcome>, default: bool) -> Result<bool, AnalyzeError> {
    match outcome.map(|outcome| outcome.when.trim()) {
        Some(when) if !when.is_empty() => parse_when_bool(when),
        _ => Ok(default),
    }
}

// ============================================================================
// SECTION: Group Mode
// ============================================================================

/// Named captures of the first match.
///
/// Empty when nothing matched; otherwise every named group is present, with
/// an empty value for groups that did not participate.
fn named_captures(regex: &Regex, text: &str) -> BTreeMap<String, String> {
    let Some(captures) = regex.captures(text) else {
        return BTreeMap::new();
    };
    regex
        .capture_names()
        .flatten()
        .map(|name| {
            let value = captures.name(name).map_or("", |found| found.as_str());
            (name.to_string(), value.to_string())
        })
        .collect()
}

/// Template context holding every named group of `regex`.
fn captures_context(regex: &Regex, captures: &BTreeMap<String, String>) -> Value {
    Value::Object(
        regex
            .capture_names()
            .flatten()
            .map(|name| {
                let value = captures.get(name).cloned().unwrap_or_default();
                (name.to_string(), Value::String(value))
            })
            .collect(),
    )
}

/// Evaluates `name op value` against the captures.
///
/// Integer operands compare numerically; a capture that is not an integer
/// does not match. Other operands support equality only.
fn compare_capture(when: &str, captures: &BTreeMap<String, String>) -> Result<bool, AnalyzeError> {
    let (name, operator, operand) = Condition::parse_selected(when)?;
    let Some(found) = captures.get(&name) else {
        return Ok(false);
    };
    if let Ok(expected) = operand.parse::<i64>() {
        return Ok(found
            .trim()
            .parse::<i64>()
            .is_ok_and(|actual| operator.compare(&actual, &expected)));
    }
    match operator {
        ComparisonOperator::Equal | ComparisonOperator::NotEqual => {
            evaluate_exact(operator, found, &operand)
        }
        other => Err(AnalyzeError::ConditionParse(format!(
            "operator {other} cannot compare '{found}' and '{operand}'"
        ))),
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

    use super::*;
    use crate::runtime::store::InMemoryEvidenceStore;

    fn store() -> InMemoryEvidenceStore {
        InMemoryEvidenceStore::new()
            .with_file("logs/app.log", "starting\nerror: disk full\n")
            .with_file("logs/worker.log", "starting\nready\n")
            .with_file("logs/skip.log", "error: ignored\n")
            .with_file("ceph/status.txt", "health: HEALTH_WARN osds: 2 of 3 up\n")
    }

    fn spec(file_name: &str) -> TextAnalyzeSpec {
        TextAnalyzeSpec {
            collector_name: "logs".to_string(),
            file_name: file_name.to_string(),
            exclude_files: vec!["skip.log".to_string()],
            ..TextAnalyzeSpec::default()
        }
    }

    #[test]
    fn pattern_mode_reports_each_file() {
        let mut spec = spec("*.log");
        spec.regex_pattern = "error:".to_string();
        spec.outcomes = vec![
            Outcome::pass("false", "no errors"),
            Outcome::fail("true", "errors found"),
        ];
        let output = analyze_text(&store(), &spec).unwrap();
        let messages: Vec<_> = output.results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, ["errors found", "no errors"]);
        assert_eq!(output.results[0].title, "logs");
    }

    #[test]
    fn pattern_mode_rejects_agreeing_clauses() {
        let mut spec = spec("app.log");
        spec.regex_pattern = "error".to_string();
        spec.outcomes = vec![Outcome::pass("true", "a"), Outcome::fail("true", "b")];
        assert!(matches!(analyze_text(&store(), &spec), Err(AnalyzeError::Invalid(_))));
    }

    #[test]
    fn group_mode_compares_and_renders_captures() {
        let mut spec = spec("status.txt");
        spec.collector_name = "ceph".to_string();
        spec.exclude_files.clear();
        spec.regex_groups = r"health: (?P<Health>\w+) osds: (?P<Up>\d+) of (?P<Total>\d+)".to_string();
        spec.outcomes = vec![
            Outcome::fail("Up < 2", "too few osds"),
            Outcome::warn("Health == HEALTH_WARN", "{{ .Up }}/{{ .Total }} osds up"),
            Outcome::pass("", "healthy"),
        ];
        let output = analyze_text(&store(), &spec).unwrap();
        assert!(output.results[0].is_warn());
        assert_eq!(output.results[0].message, "2/3 osds up");
    }

    #[test]
    fn group_mode_missing_capture_does_not_match() {
        let mut spec = spec("worker.log");
        spec.regex_groups = r"error: (?P<Reason>.+)".to_string();
        spec.outcomes = vec![Outcome::fail("Reason == full", "x")];
        let output = analyze_text(&store(), &spec).unwrap();
        assert_eq!(output.results[0].verdict, None);
    }

    #[test]
    fn catch_all_outcome_renders_unmatched_groups_empty() {
        let mut spec = spec("worker.log");
        spec.regex_groups = r"error: (?P<Reason>.+)".to_string();
        spec.outcomes = vec![
            Outcome::fail("Reason == full", "disk full"),
            Outcome::warn("", "unexpected state: {{ .Reason }}"),
        ];
        let output = analyze_text(&store(), &spec).unwrap();
        assert_eq!(output.results.len(), 1);
        assert!(output.results[0].is_warn());
        assert_eq!(output.results[0].message, "unexpected state: ");
    }

    #[test]
    fn optional_group_without_participation_is_empty() {
        let regex = Regex::new(r"error: (?P<Reason>\w+)(?: code=(?P<Code>\d+))?").unwrap();
        let captures = named_captures(&regex, "error: disk");
        assert_eq!(captures.get("Reason").map(String::as_str), Some("disk"));
        assert_eq!(captures.get("Code").map(String::as_str), Some(""));
        assert!(!compare_capture("Code == 5", &captures).unwrap());
        let context = captures_context(&regex, &BTreeMap::new());
        assert_eq!(context["Code"], "");
        assert_eq!(context["Reason"], "");
    }

    #[test]
    fn no_files_warns_unless_ignored() {
        let mut spec = spec("*.txt");
        spec.regex_pattern = "x".to_string();
        let output = analyze_text(&store(), &spec).unwrap();
        assert!(output.results[0].is_warn());
        assert_eq!(output.results[0].message, NO_MATCHING_FILES_MESSAGE);
        spec.ignore_if_no_files = true;
        assert!(analyze_text(&store(), &spec).unwrap().results.is_empty());
    }

    #[test]
    fn no_mode_is_invalid() {
        let output = analyze_text(&store(), &spec("app.log")).unwrap();
        assert!(output.results[0].is_fail());
        assert_eq!(output.results[0].message, INVALID_ANALYZER_MESSAGE);
    }
}
