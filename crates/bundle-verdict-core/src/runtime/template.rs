// crates/bundle-verdict-core/src/runtime/template.rs
// ============================================================================
// Module: Bundle Verdict Result Templater
// Description: `{{ .Field.Path }}` substitution over decoded evidence.
// Purpose: Render result titles and messages from evidence fields.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Templates support field actions only: `{{ . }}`, `{{ .A.B }}`, with
//! optional `{{-`/`-}}` whitespace trimming. Field lookup tries the exact key
//! first, then the key with a lowercased first letter, so `.Status.Reason`
//! resolves against both Go-style and JSON-style (`status.reason`) contexts.
//! Any other action is an error. Unknown fields are errors under
//! [`MissingField::Error`] and render empty under [`MissingField::Empty`],
//! which capture-group and CPU messages use. Rendering is a pure function of
//! the template and the context.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::AnalyzeError;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Handling of fields absent from the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// Unknown fields fail the render.
    Error,
    /// Unknown fields render as an empty string.
    Empty,
}

/// Renders a template against a JSON context; unknown fields are errors.
///
/// # Errors
///
/// Returns [`AnalyzeError::Template`] on syntax errors, unsupported actions,
/// or unknown fields.
pub fn render(template: &str, context: &Value) -> Result<String, AnalyzeError> {
    render_with(template, context, MissingField::Error)
}

/// Renders a template with an explicit policy for unknown fields.
///
/// # Errors
///
/// Returns [`AnalyzeError::Template`] on syntax errors, unsupported actions,
/// or unknown fields under [`MissingField::Error`].
pub fn render_with(
    template: &str,
    context: &Value,
    missing: MissingField,
) -> Result<String, AnalyzeError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let (text, after_open) = rest.split_at(start);
        let body_start = &after_open[2..];
        let end = body_start
            .find("}}")
            .ok_or_else(|| AnalyzeError::Template(format!("unclosed action in '{template}'")))?;
        let mut body = &body_start[..end];
        rest = &body_start[end + 2..];

        if let Some(trimmed) = body.strip_prefix('-') {
            out.push_str(text.trim_end());
            body = trimmed;
        } else {
            out.push_str(text);
        }
        let trim_after = if let Some(trimmed) = body.strip_suffix('-') {
            body = trimmed;
            true
        } else {
            false
        };

        out.push_str(&render_action(body.trim(), context, missing)?);
        if trim_after {
            rest = rest.trim_start();
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Evaluates one field action.
fn render_action(
    action: &str,
    context: &Value,
    missing: MissingField,
) -> Result<String, AnalyzeError> {
    if action == "." {
        return Ok(display(context));
    }
    let Some(path) = action.strip_prefix('.') else {
        return Err(AnalyzeError::Template(format!("unsupported template action '{action}'")));
    };
    if path.is_empty() || path.contains(char::is_whitespace) {
        return Err(AnalyzeError::Template(format!("unsupported template action '{action}'")));
    }
    let mut current = context;
    for field in path.split('.') {
        match (lookup(current, field), missing) {
            (Some(found), _) => current = found,
            (None, MissingField::Empty) => return Ok(String::new()),
            (None, MissingField::Error) => {
                return Err(AnalyzeError::Template(format!(
                    "can't evaluate field {field} in '{action}'"
                )));
            }
        }
    }
    Ok(display(current))
}

/// Looks up a field by exact key, then by lower-first-letter key.
fn lookup<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(found) = map.get(field) {
        return Some(found);
    }
    let mut chars = field.chars();
    let first = chars.next()?;
    let lowered = first.to_lowercase().chain(chars).collect::<String>();
    map.get(&lowered)
}

/// Formats a value for output; null renders as empty.
fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
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

    #[test]
    fn renders_nested_fields_with_case_fallback() {
        let context =
            json!({"namespace": "kube-system", "name": "dns", "status": {"reason": "Running"}});
        let template = "Pod {{ .Namespace }}/{{ .Name }} is {{ .Status.Reason }}";
        let rendered = render(template, &context).unwrap();
        assert_eq!(rendered, "Pod kube-system/dns is Running");
    }

    #[test]
    fn exact_key_wins_over_fallback() {
        let context = json!({"Info": {"MachineArch": "x86_64"}, "info": {"machineArch": "arm64"}});
        assert_eq!(render("{{ .Info.MachineArch }}", &context).unwrap(), "x86_64");
    }

    #[test]
    fn unknown_field_is_an_error() {
        let err = render("{{ .Missing }}", &json!({})).unwrap_err();
        assert!(matches!(err, AnalyzeError::Template(_)));
    }

    #[test]
    fn empty_policy_renders_unknown_fields_blank() {
        let context = json!({"Info": {"MachineArch": "arm64"}});
        let template = "{{ .Info.Cores }}|{{ .Other }}|{{ .Info.MachineArch }}";
        let rendered = render_with(template, &context, MissingField::Empty).unwrap();
        assert_eq!(rendered, "||arm64");
        assert!(render_with("{{ if .A }}", &context, MissingField::Empty).is_err());
    }

    #[test]
    fn unsupported_action_and_unclosed_braces_fail() {
        assert!(render("{{ if .A }}x{{ end }}", &json!({"A": true})).is_err());
        assert!(render("{{ .A", &json!({"A": 1})).is_err());
    }

    #[test]
    fn trim_markers_strip_whitespace() {
        let context = json!({"A": "x"});
        assert_eq!(render("a   {{- .A -}}   b", &context).unwrap(), "axb");
    }

    #[test]
    fn plain_text_and_null_values() {
        assert_eq!(render("no actions", &json!(null)).unwrap(), "no actions");
        assert_eq!(render("[{{ .A }}]", &json!({"A": null})).unwrap(), "[]");
        assert_eq!(render("{{ .N }}", &json!({"N": 3})).unwrap(), "3");
    }
}
