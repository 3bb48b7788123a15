use crate::errors::ToolError;
use crate::tools::params::{value_type_name, ParameterSpec};
use serde_json::{Map, Value};

#[derive(Clone)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    /// Checks invocation arguments against the declared parameter
    /// descriptors before any network activity. Every required parameter
    /// must be present and every supplied value must match its declared
    /// type. Returns the validated subset; undeclared arguments are
    /// dropped.
    pub fn validate_args(
        &self,
        specs: &[ParameterSpec],
        args: &Value,
    ) -> Result<Map<String, Value>, ToolError> {
        let empty = Map::new();
        let supplied = match args {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(ToolError::invalid_params(format!(
                    "Invocation arguments must be an object, got {}",
                    value_type_name(other)
                )))
            }
        };

        let mut validated = Map::new();
        for spec in specs {
            match supplied.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        return Err(ToolError::invalid_params(format!(
                            "Missing required parameter {:?}",
                            spec.name
                        )));
                    }
                }
                Some(value) => {
                    if !spec.param_type.matches(value) {
                        return Err(ToolError::invalid_params(format!(
                            "Parameter {:?} must be of type {}, got {}",
                            spec.name,
                            spec.param_type.as_str(),
                            value_type_name(value)
                        )));
                    }
                    validated.insert(spec.name.clone(), value.clone());
                }
            }
        }
        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::Validation;
    use crate::tools::params::{ParameterSpec, ParameterType};
    use serde_json::json;

    fn spec(name: &str, param_type: ParameterType, required: bool) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            param_type,
            required,
            description: String::new(),
        }
    }

    #[test]
    fn rejects_missing_required_parameter() {
        let specs = vec![spec("opId", ParameterType::String, true)];
        let err = Validation::new()
            .validate_args(&specs, &json!({}))
            .unwrap_err();
        assert!(err.message.contains("opId"));
    }

    #[test]
    fn null_counts_as_missing() {
        let specs = vec![spec("opId", ParameterType::String, true)];
        let result = Validation::new().validate_args(&specs, &json!({"opId": null}));
        assert!(result.is_err());
    }

    #[test]
    fn optional_parameter_may_be_absent() {
        let specs = vec![spec("region", ParameterType::String, false)];
        let validated = Validation::new().validate_args(&specs, &json!({})).unwrap();
        assert!(validated.is_empty());
    }

    #[test]
    fn rejects_wrong_type() {
        let specs = vec![spec("opId", ParameterType::String, true)];
        let err = Validation::new()
            .validate_args(&specs, &json!({"opId": 42}))
            .unwrap_err();
        assert!(err.message.contains("string"));
    }

    #[test]
    fn drops_undeclared_arguments() {
        let specs = vec![spec("opId", ParameterType::String, true)];
        let validated = Validation::new()
            .validate_args(&specs, &json!({"opId": "op1", "extra": true}))
            .unwrap();
        assert_eq!(validated.len(), 1);
        assert_eq!(validated["opId"], json!("op1"));
    }

    #[test]
    fn accepts_each_declared_type() {
        let specs = vec![
            spec("s", ParameterType::String, true),
            spec("n", ParameterType::Number, true),
            spec("b", ParameterType::Boolean, true),
            spec("a", ParameterType::Array, true),
        ];
        let validated = Validation::new()
            .validate_args(&specs, &json!({"s": "x", "n": 1.5, "b": false, "a": [1, 2]}))
            .unwrap();
        assert_eq!(validated.len(), 4);
    }
}
