//! MCP tool descriptor emission.

use crate::schema::InputSchema;
use crate::spec::ToolSpec;
use rmcp::model::{JsonObject, Tool};
use serde::Serialize;
use serde_json::Value;
use sha2::Digest as _;
use std::sync::Arc;

/// The MCP tool-registration document: exactly `name`, `description` and `inputSchema`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDescriptor {
    #[must_use]
    pub fn new(spec: &ToolSpec, schema: &InputSchema) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: schema.to_value(),
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        let mut out =
            serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_value().to_string());
        out.push('\n');
        out
    }

    /// Single-line JSON, used when the descriptor is embedded in handler source.
    #[must_use]
    pub fn to_json_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_value().to_string())
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema,
        })
    }

    /// Convert into an rmcp `Tool` for registration with an rmcp server.
    #[must_use]
    pub fn to_mcp_tool(&self) -> Tool {
        let schema_obj = self
            .input_schema
            .as_object()
            .cloned()
            .unwrap_or_else(JsonObject::new);
        Tool::new(
            self.name.clone(),
            self.description.clone(),
            Arc::new(schema_obj),
        )
    }

    /// Hex SHA-256 of the pretty JSON rendering. Changes whenever the tool contract changes.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha2::Sha256::new();
        hasher.update(self.to_json_pretty().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::ToolDescriptor;
    use crate::schema::InputSchema;
    use crate::spec::{ParamType, Parameter, ToolSpec};
    use serde_json::{Value, json};

    fn pokemon() -> ToolSpec {
        ToolSpec::new(
            "getPokemonByName",
            "Get information about a Pokemon by its name",
            "https://pokeapi.co/api/v2/pokemon/{name}",
        )
        .with_parameter(
            Parameter::new("name", ParamType::String)
                .required(true)
                .description("Pokemon name or ID"),
        )
    }

    fn descriptor(spec: &ToolSpec) -> ToolDescriptor {
        ToolDescriptor::new(spec, &InputSchema::build(&spec.parameters))
    }

    #[test]
    fn descriptor_has_exactly_three_fields() {
        let v: Value =
            serde_json::from_str(&descriptor(&pokemon()).to_json_pretty()).expect("json");
        let keys: Vec<&str> = v
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["name", "description", "inputSchema"]);
        assert_eq!(v["inputSchema"]["type"], "object");
        assert_eq!(v["inputSchema"]["required"], json!(["name"]));
        assert_eq!(v["inputSchema"]["properties"]["name"]["type"], "string");
        assert!(v["inputSchema"].get("$schema").is_none());
    }

    #[test]
    fn pretty_json_is_stable() {
        let d = descriptor(&pokemon());
        assert_eq!(
            d.to_json_pretty(),
            r#"{
  "name": "getPokemonByName",
  "description": "Get information about a Pokemon by its name",
  "inputSchema": {
    "type": "object",
    "properties": {
      "name": {
        "type": "string",
        "description": "Pokemon name or ID"
      }
    },
    "required": [
      "name"
    ]
  }
}
"#
        );
        let compact: Value = serde_json::from_str(&d.to_json_compact()).expect("json");
        assert_eq!(d.to_value(), compact);
    }

    #[test]
    fn converts_to_mcp_tool() {
        let tool = descriptor(&pokemon()).to_mcp_tool();
        assert_eq!(tool.name, "getPokemonByName");
        assert_eq!(
            tool.description.as_deref(),
            Some("Get information about a Pokemon by its name")
        );
        assert_eq!(tool.input_schema.get("required"), Some(&json!(["name"])));
    }

    #[test]
    fn fingerprint_tracks_contract_changes() {
        let a = descriptor(&pokemon());
        assert_eq!(a.fingerprint(), descriptor(&pokemon()).fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut changed = pokemon();
        changed.parameters[0].required = false;
        assert_ne!(a.fingerprint(), descriptor(&changed).fingerprint());
    }
}
