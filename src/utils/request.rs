use crate::errors::ToolError;
use crate::tools::params::{value_type_name, ParameterSpec};
use crate::utils::template::{render_placeholders, stringify_value};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::HashMap;
use url::Url;

/// Builds the fully-qualified request URL: path-template substitution over
/// the path parameters, concatenation onto the base URL, then query
/// assembly. Declared query defaults go first; explicit query parameters
/// are appended after them, so later values win for consumers that read
/// the last occurrence. Absent query values serialize as empty strings.
/// A malformed template or a result that does not parse as a URL is an
/// error.
///
/// Pure: identical inputs always produce an identical URL.
pub fn build_url(
    base_url: &str,
    path_template: &str,
    path_params: &[ParameterSpec],
    query_params: &[ParameterSpec],
    default_query: &BTreeMap<String, String>,
    args: &Map<String, Value>,
) -> Result<Url, ToolError> {
    let mut path_values = Map::new();
    for spec in path_params {
        if let Some(value) = args.get(&spec.name) {
            path_values.insert(spec.name.clone(), value.clone());
        }
    }
    let rendered = render_placeholders(path_template, &path_values)?;

    let full = format!("{}{}", base_url, rendered);
    let mut url = Url::parse(&full).map_err(|err| {
        ToolError::invalid_params(format!("Malformed request URL {:?}: {}", full, err))
    })?;

    if !default_query.is_empty() || !query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in default_query {
            pairs.append_pair(key, value);
        }
        for spec in query_params {
            let value = args
                .get(&spec.name)
                .map(stringify_value)
                .unwrap_or_default();
            pairs.append_pair(&spec.name, &value);
        }
    }
    Ok(url)
}

/// Merges per-invocation header parameter values over the static header
/// set. Header values must already be strings; numbers, booleans, and
/// arrays are rejected rather than implicitly converted.
pub fn build_headers(
    static_headers: &HashMap<String, String>,
    header_params: &[ParameterSpec],
    args: &Map<String, Value>,
) -> Result<HashMap<String, String>, ToolError> {
    let mut headers = static_headers.clone();
    for spec in header_params {
        let Some(value) = args.get(&spec.name) else {
            continue;
        };
        match value {
            Value::String(text) => {
                headers.insert(spec.name.clone(), text.clone());
            }
            other => {
                return Err(ToolError::invalid_params(format!(
                    "Header param {:?} got value of type {}, not string",
                    spec.name,
                    value_type_name(other)
                )))
            }
        }
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::{build_headers, build_url};
    use crate::tools::params::{ParameterSpec, ParameterType};
    use serde_json::{json, Map, Value};
    use std::collections::BTreeMap;
    use std::collections::HashMap;

    fn spec(name: &str, param_type: ParameterType) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            param_type,
            required: true,
            description: String::new(),
        }
    }

    fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn substitutes_path_parameters() {
        let url = build_url(
            "http://example.com",
            "/operations/{{.opId}}",
            &[spec("opId", ParameterType::String)],
            &[],
            &BTreeMap::new(),
            &args(&[("opId", json!("op1"))]),
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://example.com/operations/op1");
    }

    #[test]
    fn identical_inputs_build_identical_urls() {
        let path_specs = [spec("opId", ParameterType::String)];
        let query_specs = [spec("verbose", ParameterType::Boolean)];
        let mut defaults = BTreeMap::new();
        defaults.insert("format".to_string(), "json".to_string());
        let call_args = args(&[("opId", json!("op1")), ("verbose", json!(true))]);

        let first = build_url(
            "http://example.com",
            "/operations/{{.opId}}",
            &path_specs,
            &query_specs,
            &defaults,
            &call_args,
        )
        .unwrap();
        let second = build_url(
            "http://example.com",
            "/operations/{{.opId}}",
            &path_specs,
            &query_specs,
            &defaults,
            &call_args,
        )
        .unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.as_str(),
            "http://example.com/operations/op1?format=json&verbose=true"
        );
    }

    #[test]
    fn absent_query_value_serializes_empty() {
        let url = build_url(
            "http://example.com",
            "/list",
            &[],
            &[spec("cursor", ParameterType::String)],
            &BTreeMap::new(),
            &Map::new(),
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://example.com/list?cursor=");
    }

    #[test]
    fn malformed_result_is_rejected() {
        let result = build_url(
            "not a url",
            "/operations/{{.opId}}",
            &[spec("opId", ParameterType::String)],
            &[],
            &BTreeMap::new(),
            &args(&[("opId", json!("op1"))]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn malformed_template_is_rejected() {
        let err = build_url(
            "http://example.com",
            "/operations/{{.opId",
            &[spec("opId", ParameterType::String)],
            &[],
            &BTreeMap::new(),
            &args(&[("opId", json!("op1"))]),
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::errors::ToolErrorKind::InvalidParams);
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn header_params_overlay_static_headers() {
        let mut static_headers = HashMap::new();
        static_headers.insert("Accept".to_string(), "application/json".to_string());
        static_headers.insert("X-Token".to_string(), "default".to_string());

        let headers = build_headers(
            &static_headers,
            &[spec("X-Token", ParameterType::String)],
            &args(&[("X-Token", json!("per-call"))]),
        )
        .unwrap();
        assert_eq!(headers["Accept"], "application/json");
        assert_eq!(headers["X-Token"], "per-call");
    }

    #[test]
    fn non_string_header_value_is_rejected() {
        let err = build_headers(
            &HashMap::new(),
            &[spec("X-Retries", ParameterType::Number)],
            &args(&[("X-Retries", json!(3))]),
        )
        .unwrap_err();
        assert!(err.message.contains("not string"));
    }
}
