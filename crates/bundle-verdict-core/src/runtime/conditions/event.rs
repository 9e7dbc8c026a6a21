// crates/bundle-verdict-core/src/runtime/conditions/event.rs
// ============================================================================
// Module: Event Matching
// Description: Locate the first event matching reason, kind and message.
// Purpose: Back the `event` analyzer's existence check.
// Dependencies: crate::core, regex
// ============================================================================

//! ## Overview
//! Reason is required and compared case-insensitively. Kind is optional and
//! compared case-insensitively against the involved object. The message regex
//! is optional; a regex that fails to compile is reported as a warning and
//! matches nothing.

use regex::Regex;

use crate::core::AnalyzeWarning;
use crate::core::kube::Event;

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Criteria an event must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventFilter {
    /// Required event reason.
    pub reason: String,
    /// Optional involved-object kind.
    pub kind: String,
    /// Optional message regex.
    pub message_regex: String,
}

impl EventFilter {
    /// Creates a filter for `reason` with no kind or message constraint.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Self::default()
        }
    }
}

/// Returns the first event satisfying `filter`, in document order.
pub fn find_matching_event<'e>(
    events: &'e [Event],
    filter: &EventFilter,
    subject: &str,
    warnings: &mut Vec<AnalyzeWarning>,
) -> Option<&'e Event> {
    let regex = if filter.message_regex.is_empty() {
        None
    } else {
        match Regex::new(&filter.message_regex) {
            Ok(regex) => Some(regex),
            Err(err) => {
                warnings.push(AnalyzeWarning::new(
                    subject,
                    format!("failed to compile message regex '{}': {err}", filter.message_regex),
                ));
                return None;
            }
        }
    };

    events.iter().find(|event| {
        !filter.reason.is_empty()
            && event.reason.eq_ignore_ascii_case(&filter.reason)
            && (filter.kind.is_empty()
                || event.involved_object.kind.eq_ignore_ascii_case(&filter.kind))
            && regex.as_ref().is_none_or(|regex| regex.is_match(&event.message))
    })
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;
    use crate::core::ObjectReference;

    fn event(reason: &str, kind: &str, message: &str) -> Event {
        Event {
            involved_object: ObjectReference {
                kind: kind.to_string(),
                name: "web-0".to_string(),
                ..ObjectReference::default()
            },
            reason: reason.to_string(),
            message: message.to_string(),
            ..Event::default()
        }
    }

    #[test]
    fn reason_and_kind_are_case_insensitive() {
        let events =
            vec![event("BackOff", "Pod", "restarting"), event("Unhealthy", "Pod", "probe failed")];
        let filter = EventFilter {
            kind: "pod".to_string(),
            ..EventFilter::new("unhealthy")
        };
        let mut warnings = Vec::new();
        let found = find_matching_event(&events, &filter, "Event", &mut warnings).unwrap();
        assert_eq!(found.message, "probe failed");
        assert!(warnings.is_empty());
    }

    #[test]
    fn message_regex_narrows_the_match() {
        let events = vec![
            event("Unhealthy", "Pod", "Liveness probe failed"),
            event("Unhealthy", "Pod", "Readiness probe failed: 503"),
        ];
        let filter = EventFilter {
            message_regex: "^Readiness.*503$".to_string(),
            ..EventFilter::new("Unhealthy")
        };
        let found = find_matching_event(&events, &filter, "Event", &mut Vec::new()).unwrap();
        assert!(found.message.starts_with("Readiness"));
    }

    #[test]
    fn invalid_regex_warns_and_matches_nothing() {
        let events = vec![event("Unhealthy", "Pod", "anything")];
        let filter = EventFilter {
            message_regex: "(".to_string(),
            ..EventFilter::new("Unhealthy")
        };
        let mut warnings = Vec::new();
        assert!(find_matching_event(&events, &filter, "Event", &mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn empty_reason_never_matches() {
        let events = vec![event("", "Pod", "anything")];
        let found = find_matching_event(&events, &EventFilter::default(), "Event", &mut Vec::new());
        assert!(found.is_none());
    }
}
