//! REST endpoint -> MCP tool compiler.
//!
//! Takes a [`ToolSpec`] (tool name, description, endpoint template, ordered parameters) and
//! produces two text artifacts:
//! - a [`ToolDescriptor`] (MCP tool-registration JSON)
//! - handler source that validates inbound parameters and proxies the call to the endpoint
//!
//! It intentionally performs **no** network I/O and never runs the generated handler.

pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod handler;
pub mod schema;
pub mod spec;
pub mod template;
pub mod validation;

pub use compiler::{CompileOptions, ToolArtifacts, compile};
pub use descriptor::ToolDescriptor;
pub use error::{CompilerError, Result};
pub use handler::HandlerTarget;
pub use schema::InputSchema;
pub use spec::{ParamType, Parameter, ParameterUpdate, ToolSpec};
pub use template::{EndpointTemplate, UnreferencedParams};
pub use validation::{IssueKind, ValidationFailure, ValidationIssue, ValidationReport, validate};
