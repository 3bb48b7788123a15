use crate::errors::ToolError;
use serde_json::{Map, Value};

fn placeholder_key(expression: &str) -> &str {
    let trimmed = expression.trim();
    trimmed.strip_prefix('.').unwrap_or(trimmed).trim()
}

/// Flattens a JSON value into its path-segment text form. Strings render
/// without quotes; null renders empty.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Checks that every `{{` opener in `template` has a matching `}}`.
/// Tool construction runs this so a broken template is rejected up
/// front instead of surfacing as a garbage URL on the first call.
pub fn validate_placeholders(template: &str) -> Result<(), ToolError> {
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let tail = &rest[start..];
        let Some(end) = tail.find("}}") else {
            return Err(ToolError::invalid_params(format!(
                "Unterminated placeholder in template {:?}",
                template
            )));
        };
        rest = &tail[end + 2..];
    }
    Ok(())
}

/// Renders `{{.name}}` (or `{{name}}`) placeholders from `values`. A
/// missing name renders as an empty string; required parameters are
/// enforced by validation upstream, not here. An unterminated placeholder
/// is an error.
pub fn render_placeholders(
    template: &str,
    values: &Map<String, Value>,
) -> Result<String, ToolError> {
    let mut out = String::new();
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let (prefix, tail) = rest.split_at(start);
        out.push_str(prefix);
        let Some(end) = tail.find("}}") else {
            return Err(ToolError::invalid_params(format!(
                "Unterminated placeholder in template {:?}",
                template
            )));
        };
        let key = placeholder_key(&tail[2..end]);
        if let Some(value) = values.get(key) {
            out.push_str(&stringify_value(value));
        }
        rest = &tail[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}
