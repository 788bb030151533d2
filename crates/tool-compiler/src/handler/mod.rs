//! Handler source emission.
//!
//! A [`HandlerPlan`] captures everything a generated handler needs, independent of the target
//! language. A [`HandlerTemplate`] turns the plan into source text; swapping the template swaps the
//! target runtime. Every template must emit a handler that:
//! - rejects the first missing required parameter (declaration order) with a 400
//! - substitutes `{name}` placeholders with percent-encoded values
//! - forwards the upstream response body, or answers 500 with [`FETCH_FAILED_MESSAGE`]

mod rust;
mod typescript;

use crate::descriptor::ToolDescriptor;
use crate::schema::InputSchema;
use crate::template::{EndpointTemplate, UnreferencedParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use rust::RustAxumTemplate;
pub use typescript::TypeScriptExpressTemplate;

/// Error text returned when the upstream call fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data from external API";

/// Prefix of the 400 error body; the parameter name follows.
pub const MISSING_PARAM_PREFIX: &str = "Missing parameter: ";

/// Target-agnostic description of one handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerPlan {
    pub tool_name: String,
    pub descriptor: ToolDescriptor,
    pub endpoint: String,
    /// Required parameter names, in declaration order.
    pub required: Vec<String>,
    /// Placeholder names, in order of first appearance in the endpoint.
    pub path_params: Vec<String>,
    /// Parameters forwarded as query-string pairs (declaration order).
    pub query_params: Vec<String>,
}

impl HandlerPlan {
    #[must_use]
    pub fn new(
        descriptor: &ToolDescriptor,
        schema: &InputSchema,
        template: &EndpointTemplate,
        policy: UnreferencedParams,
    ) -> Self {
        let query_params = match policy {
            UnreferencedParams::Query => schema
                .properties
                .keys()
                .filter(|name| !template.references(name))
                .cloned()
                .collect(),
            UnreferencedParams::Reject | UnreferencedParams::Ignore => Vec::new(),
        };

        Self {
            tool_name: descriptor.name.clone(),
            descriptor: descriptor.clone(),
            endpoint: template.as_str().to_string(),
            required: schema.required.clone(),
            path_params: template.placeholders().to_vec(),
            query_params,
        }
    }
}

pub trait HandlerTemplate: Send + Sync {
    /// Conventional file name for the emitted handler.
    fn file_name(&self, tool_name: &str) -> String;

    fn render(&self, plan: &HandlerPlan) -> String;
}

/// Built-in handler targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerTarget {
    /// Express + axios module (`<name>.tool.ts`).
    #[default]
    #[serde(rename = "typescript")]
    TypeScript,
    /// axum + reqwest module (`<name>_tool.rs`).
    #[serde(rename = "rust")]
    Rust,
}

impl HandlerTarget {
    #[must_use]
    pub fn template(self) -> &'static dyn HandlerTemplate {
        match self {
            HandlerTarget::TypeScript => &TypeScriptExpressTemplate,
            HandlerTarget::Rust => &RustAxumTemplate,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerTarget::TypeScript => "typescript",
            HandlerTarget::Rust => "rust",
        }
    }
}

impl fmt::Display for HandlerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(HandlerTarget::TypeScript),
            "rust" | "rs" => Ok(HandlerTarget::Rust),
            other => Err(format!(
                "unknown handler target '{other}' (expected 'typescript' or 'rust')"
            )),
        }
    }
}

/// Substitute `%%KEY%%` markers in a single left-to-right pass.
///
/// Substituted values are never rescanned, so user text that happens to contain a marker is
/// emitted verbatim. Unknown markers are left as-is.
pub(crate) fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    const MARK: &str = "%%";
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find(MARK) {
        out.push_str(&rest[..start]);
        let after = &rest[start + MARK.len()..];
        let key_end = after.find(MARK);
        let value = key_end.and_then(|end| {
            let key = &after[..end];
            vars.iter().find(|(k, _)| *k == key).map(|(_, v)| (end, *v))
        });
        match value {
            Some((end, v)) => {
                out.push_str(v);
                rest = &after[end + MARK.len()..];
            }
            None => {
                out.push_str(MARK);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
