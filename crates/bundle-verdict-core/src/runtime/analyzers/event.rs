// crates/bundle-verdict-core/src/runtime/analyzers/event.rs
// ============================================================================
// Module: Event Analyzer
// Description: Existence check over a namespace's collected events.
// Purpose: Flag (or clear) a bundle based on a matching Kubernetes event.
// Dependencies: crate::{core, interfaces, runtime}, serde, serde_json
// ============================================================================

//! ## Overview
//! The analyzer looks for the first event in the namespace matching reason,
//! kind and message regex. Each outcome's `when` is `true` ("a matching event
//! exists") or `false`. When an event matched, the outcome message is
//! rendered against it; an empty template or a render failure falls back to
//! a summary of the event.

use serde::Deserialize;
use serde::Serialize;

use crate::core::AnalyzeError;
use crate::core::AnalyzeMeta;
use crate::core::AnalyzeWarning;
use crate::core::AnalyzerOutput;
use crate::core::Outcome;
use crate::core::kube::Event;
use crate::core::kube::decode_object_list;
use crate::core::paths;
use crate::interfaces::EvidenceStore;
use crate::runtime::aggregator::ResultAggregator;
use crate::runtime::conditions::EventFilter;
use crate::runtime::conditions::evaluate_boolean;
use crate::runtime::conditions::find_matching_event;
use crate::runtime::resolver::OutcomeResolver;
use crate::runtime::template::render;

/// Default analyzer title.
pub const EVENT_TITLE: &str = "Event";
/// Collected events directory.
const EVENTS_DIR: &str = "events";

/// `event` analyzer spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventAnalyze {
    /// Shared analyzer metadata.
    #[serde(flatten)]
    pub meta: AnalyzeMeta,
    /// Collector name, used as a title fallback.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub collector_name: String,
    /// Namespace whose events are inspected; defaults to `default`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Involved object kind filter.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Required event reason.
    pub reason: String,
    /// Message regex filter.
    #[serde(rename = "regex", skip_serializing_if = "String::is_empty")]
    pub message_regex: String,
    /// Ordered outcomes.
    pub outcomes: Vec<Outcome>,
}

impl EventAnalyze {
    /// Check name, then collector name, then `Event`.
    #[must_use]
    pub fn title(&self) -> String {
        if self.collector_name.is_empty() {
            self.meta.title_or(EVENT_TITLE)
        } else {
            self.meta.title_or(&self.collector_name)
        }
    }
}

/// Evaluates an `event` analyzer.
///
/// # Errors
///
/// Returns [`AnalyzeError::Invalid`] without a reason, [`AnalyzeError`] from
/// the store when the namespace's events were not collected, and
/// [`AnalyzeError::ConditionParse`] for non-boolean when-clauses.
pub fn analyze_event(
    store: &dyn EvidenceStore,
    spec: &EventAnalyze,
) -> Result<AnalyzerOutput, AnalyzeError> {
    if spec.reason.trim().is_empty() {
        return Err(AnalyzeError::Invalid("reason is required".to_string()));
    }
    let strict = spec.meta.is_strict()?;
    let namespace =
        if spec.namespace.is_empty() { paths::DEFAULT_NAMESPACE } else { spec.namespace.as_str() };
    let bytes = store.get_file(&paths::cluster_resource_path(EVENTS_DIR, namespace))?;
    let events = decode_object_list::<Event>("event list", &bytes)?;

    let title = spec.title();
    let mut aggregator = ResultAggregator::new();
    let filter = EventFilter {
        reason: spec.reason.clone(),
        kind: spec.kind.clone(),
        message_regex: spec.message_regex.clone(),
    };
    let event = find_matching_event(&events, &filter, &title, aggregator.warnings());
    let mut result = OutcomeResolver::new(&title, &spec.outcomes)
        .resolve(aggregator.warnings(), |_, when| evaluate_boolean(when, event.is_some()))?
        .into_result();
    if let Some(event) = event
        && result.verdict.is_some()
    {
        result.message = decorate_message(&result.message, event, &title, aggregator.warnings());
    }
    aggregator.push_result(result);
    Ok(aggregator.finish(strict))
}

/// Renders an outcome message against the matched event.
fn decorate_message(
    template: &str,
    event: &Event,
    subject: &str,
    warnings: &mut Vec<AnalyzeWarning>,
) -> String {
    let fallback = format!(
        "Event matched. Reason: {} Name: {} Message: {}",
        event.reason, event.involved_object.name, event.message
    );
    if template.trim().is_empty() {
        return fallback;
    }
    let rendered = serde_json::to_value(event)
        .map_err(|err| AnalyzeError::Template(err.to_string()))
        .and_then(|context| render(template, &context));
    match rendered {
        Ok(message) => message.trim().to_string(),
        Err(err) => {
            warnings.push(AnalyzeWarning::new(
                subject,
                format!("failed to render event message: {err}"),
            ));
            fallback
        }
    }
}

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
        let events = json!({"items": [
            {"involvedObject": {"kind": "Pod", "name": "db-0", "namespace": "default"},
             "reason": "Unhealthy", "type": "Warning", "message": "Readiness probe failed"}
        ]});
        InMemoryEvidenceStore::new()
            .with_file("cluster-resources/events/default.json", events.to_string())
    }

    fn spec(reason: &str, outcomes: Vec<Outcome>) -> EventAnalyze {
        EventAnalyze {
            reason: reason.to_string(),
            outcomes,
            ..EventAnalyze::default()
        }
    }

    #[test]
    fn matched_event_renders_message() {
        let spec = spec(
            "unhealthy",
            vec![
                Outcome::fail("true", "{{ .InvolvedObject.Name }}: {{ .Message }}"),
                Outcome::pass("false", "no event"),
            ],
        );
        let output = analyze_event(&store(), &spec).unwrap();
        assert!(output.results[0].is_fail());
        assert_eq!(output.results[0].title, "Event");
        assert_eq!(output.results[0].message, "db-0: Readiness probe failed");
    }

    #[test]
    fn bad_template_falls_back_to_summary() {
        let spec = spec("Unhealthy", vec![Outcome::warn("true", "{{ .Nope }}")]);
        let output = analyze_event(&store(), &spec).unwrap();
        assert_eq!(
            output.results[0].message,
            "Event matched. Reason: Unhealthy Name: db-0 Message: Readiness probe failed"
        );
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn missing_event_keeps_raw_message() {
        let spec = spec(
            "BackOff",
            vec![Outcome::fail("true", "found"), Outcome::pass("false", "{{ .Reason }} absent")],
        );
        let output = analyze_event(&store(), &spec).unwrap();
        assert!(output.results[0].is_pass());
        assert_eq!(output.results[0].message, "{{ .Reason }} absent");
    }

    #[test]
    fn reason_is_required_and_namespace_must_exist() {
        let missing_reason = spec("", vec![Outcome::pass("true", "x")]);
        assert!(matches!(analyze_event(&store(), &missing_reason), Err(AnalyzeError::Invalid(_))));
        let mut other = spec("Unhealthy", vec![Outcome::pass("true", "x")]);
        other.namespace = "kube-system".to_string();
        assert!(matches!(analyze_event(&store(), &other), Err(AnalyzeError::NotFound(_))));
    }

    #[test]
    fn non_boolean_when_is_an_error() {
        let spec = spec("Unhealthy", vec![Outcome::fail("maybe", "x")]);
        assert!(matches!(analyze_event(&store(), &spec), Err(AnalyzeError::ConditionParse(_))));
    }
}
