use crate::tools::params::{ParameterManifest, ParameterSpec};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Tool manifest for external discovery. Static data only.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub description: String,
    pub parameters: Vec<ParameterManifest>,
    #[serde(rename = "authRequired")]
    pub auth_required: Vec<String>,
}

/// JSON-schema-shaped input description for MCP discovery. Properties are
/// kept in a BTreeMap so rendering is deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct McpToolsSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub properties: BTreeMap<String, Value>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct McpManifest {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: McpToolsSchema,
}

impl McpManifest {
    pub fn new(name: &str, description: &str, specs: &[ParameterSpec]) -> Self {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for spec in specs {
            properties.insert(
                spec.name.clone(),
                json!({
                    "type": spec.param_type.as_str(),
                    "description": spec.description,
                }),
            );
            if spec.required {
                required.push(spec.name.clone());
            }
        }
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: McpToolsSchema {
                schema_type: "object",
                properties,
                required,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::McpManifest;
    use crate::tools::params::ParameterSpec;
    use serde_json::json;

    #[test]
    fn schema_lists_properties_and_required() {
        let specs: Vec<ParameterSpec> = serde_json::from_value(json!([
            {"name": "opId", "type": "string", "description": "The operation ID"},
            {"name": "region", "type": "string", "required": false}
        ]))
        .unwrap();
        let manifest = McpManifest::new("wait-for-thing", "some description", &specs);

        assert_eq!(manifest.input_schema.schema_type, "object");
        assert_eq!(manifest.input_schema.properties.len(), 2);
        assert_eq!(manifest.input_schema.required, vec!["opId".to_string()]);

        let rendered = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            rendered["inputSchema"]["properties"]["opId"]["type"],
            json!("string")
        );
    }
}
