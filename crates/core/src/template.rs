//! `{{placeholder}}` substitution for notification templates.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Variable bindings supplied by the caller of a dispatch.
pub type Variables = Map<String, Value>;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}").expect("placeholder regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Missing variable: {0}")]
    MissingVariable(String),
}

/// Names of every placeholder referenced by `template`, in order of first
/// appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute every placeholder in `template` with its binding.
///
/// Strings are inserted verbatim, numbers and booleans in their JSON form.
/// A placeholder with no binding (or a `null` one) fails the whole render.
pub fn render(template: &str, variables: &Variables) -> Result<String, TemplateError> {
    if let Some(missing) = placeholders(template)
        .into_iter()
        .find(|name| variable_text(variables.get(name)).is_none())
    {
        return Err(TemplateError::MissingVariable(missing));
    }

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        variable_text(variables.get(&caps[1])).unwrap_or_default()
    });

    Ok(rendered.into_owned())
}

fn variable_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
