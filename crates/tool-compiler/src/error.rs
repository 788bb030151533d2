//! Error types for `apimcp-tool-compiler`.

use crate::validation::ValidationFailure;
use thiserror::Error;

/// Main error type for the tool compiler.
#[derive(Error, Debug)]
pub enum CompilerError {
    /// The spec failed validation; generation did not run.
    #[error("Invalid tool spec: {0}")]
    Invalid(ValidationFailure),

    /// A parameter edit addressed an index outside the parameter list.
    #[error("Parameter index {index} out of range (tool has {len} parameter(s))")]
    ParameterIndex { index: usize, len: usize },

    #[error("failed to parse tool spec from '{path}': {message}")]
    SpecParse { path: String, message: String },

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ValidationFailure> for CompilerError {
    fn from(value: ValidationFailure) -> Self {
        Self::Invalid(value)
    }
}

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompilerError>;
