use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared value type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Array,
}

impl ParameterType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParameterType::String => value.is_string(),
            ParameterType::Number => value.is_number(),
            ParameterType::Boolean => value.is_boolean(),
            ParameterType::Array => value.is_array(),
        }
    }
}

/// Descriptor for one declared parameter: used to validate caller-supplied
/// values and to render manifests for external discovery. Parameters are
/// required unless the config says otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

fn default_required() -> bool {
    true
}

/// Manifest entry rendered from a descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    pub description: String,
    pub required: bool,
}

pub fn manifest_for(specs: &[ParameterSpec]) -> Vec<ParameterManifest> {
    specs
        .iter()
        .map(|spec| ParameterManifest {
            name: spec.name.clone(),
            param_type: spec.param_type.as_str(),
            description: spec.description.clone(),
            required: spec.required,
        })
        .collect()
}

pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
