//! Author-facing tool specification.
//!
//! A [`ToolSpec`] is owned by the caller and edited in place (the dashboard form, or a file on
//! disk). The compiler only ever borrows it.

use crate::error::{CompilerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Scalar parameter types supported in generated input schemas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Number,
    Boolean,
}

impl ParamType {
    /// JSON Schema `type` keyword for this parameter type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type", default)]
    pub param_type: ParamType,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: String::new(),
            required: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A single-field edit applied to one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterUpdate {
    Name(String),
    Type(ParamType),
    Description(String),
    Required(bool),
}

/// Description of one API endpoint to be exposed as an MCP tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolSpec {
    /// Tool name; also used for the identifiers in generated handler source.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// URL template, e.g. `https://api.example.com/users/{id}`.
    #[serde(default)]
    pub endpoint: String,

    /// Ordered parameter list. Order is preserved in every generated artifact.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl ToolSpec {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            endpoint: endpoint.into(),
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> &mut Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Append a blank `string` parameter and return its index.
    pub fn add_parameter(&mut self) -> usize {
        self.parameters.push(Parameter::default());
        self.parameters.len() - 1
    }

    pub fn push_parameter(&mut self, parameter: Parameter) -> usize {
        self.parameters.push(parameter);
        self.parameters.len() - 1
    }

    /// Remove the parameter at `index`; the remaining parameters keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn remove_parameter(&mut self, index: usize) -> Result<Parameter> {
        self.check_index(index)?;
        Ok(self.parameters.remove(index))
    }

    /// Apply a single-field edit to the parameter at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn update_parameter(&mut self, index: usize, update: ParameterUpdate) -> Result<()> {
        self.check_index(index)?;
        let param = &mut self.parameters[index];
        match update {
            ParameterUpdate::Name(name) => param.name = name,
            ParameterUpdate::Type(t) => param.param_type = t,
            ParameterUpdate::Description(d) => param.description = d,
            ParameterUpdate::Required(r) => param.required = r,
        }
        Ok(())
    }

    /// Move the parameter at `from` so that it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of range.
    pub fn move_parameter(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let param = self.parameters.remove(from);
        self.parameters.insert(to, param);
        Ok(())
    }

    /// Parse a spec from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid YAML tool spec.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parse a spec from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid JSON tool spec.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a spec file. `.json` files are parsed as JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| CompilerError::SpecParse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Render the spec as YAML (used for starter files).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.parameters.len() {
            Ok(())
        } else {
            Err(CompilerError::ParameterIndex {
                index,
                len: self.parameters.len(),
            })
        }
    }
}
