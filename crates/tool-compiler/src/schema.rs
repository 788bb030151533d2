//! Parameter list -> JSON Schema (`properties` + `required`).

use crate::spec::Parameter;
use serde_json::{Map, Value, json};

/// Flat, scalar-only input schema derived from a parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSchema {
    /// Parameter name -> `{type, description}`, in declaration order.
    pub properties: Map<String, Value>,
    /// Names of required parameters, in declaration order.
    pub required: Vec<String>,
}

impl InputSchema {
    /// Build the schema for an ordered parameter list.
    ///
    /// Duplicate names are not handled here; validation rejects them before this runs.
    #[must_use]
    pub fn build(parameters: &[Parameter]) -> Self {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.param_type.as_str(),
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(param.name.clone());
            }
        }

        Self {
            properties,
            required,
        }
    }

    /// Render as a JSON Schema `object`. `required` is always present, even when empty.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }

    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

#[cfg(test)]
mod tests {
    use super::InputSchema;
    use crate::spec::{ParamType, Parameter};
    use serde_json::json;

    fn params() -> Vec<Parameter> {
        vec![
            Parameter::new("zeta", ParamType::String)
                .required(true)
                .description("last letter"),
            Parameter::new("alpha", ParamType::Number),
            Parameter::new("mid", ParamType::Boolean).required(true),
        ]
    }

    #[test]
    fn required_is_ordered_subsequence() {
        let schema = InputSchema::build(&params());
        assert_eq!(schema.required, vec!["zeta", "mid"]);
        assert!(schema.is_required("mid"));
        assert!(!schema.is_required("alpha"));
    }

    #[test]
    fn properties_keep_declaration_order() {
        let schema = InputSchema::build(&params());
        let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            schema.properties["zeta"],
            json!({"type": "string", "description": "last letter"})
        );
        assert_eq!(schema.properties["alpha"]["type"], "number");
        assert_eq!(schema.properties["alpha"]["description"], "");
    }

    #[test]
    fn empty_parameter_list_yields_empty_schema() {
        let schema = InputSchema::build(&[]);
        assert_eq!(
            schema.to_value(),
            json!({"type": "object", "properties": {}, "required": []})
        );
    }

    #[test]
    fn reordering_changes_key_order_not_required_set() {
        let mut reordered = params();
        reordered.swap(0, 2);
        let a = InputSchema::build(&params());
        let b = InputSchema::build(&reordered);

        let mut ra = a.required.clone();
        let mut rb = b.required.clone();
        ra.sort();
        rb.sort();
        assert_eq!(ra, rb);
        assert_eq!(b.required, vec!["mid", "zeta"]);
        assert_ne!(
            serde_json::to_string(&a.to_value()).expect("json"),
            serde_json::to_string(&b.to_value()).expect("json")
        );
    }

    #[test]
    fn rendered_schema_is_valid_json_schema() {
        let schema = InputSchema::build(&params()).to_value();
        let validator = jsonschema::validator_for(&schema).expect("valid schema");
        assert!(validator.is_valid(&json!({"zeta": "z", "mid": false})));
        assert!(!validator.is_valid(&json!({"zeta": "z"})));
        assert!(!validator.is_valid(&json!({"zeta": "z", "mid": true, "alpha": "nan"})));
    }
}
