//! Pre-generation checks on a [`ToolSpec`].
//!
//! Validation never stops at the first problem: every issue is collected, in a stable order
//! (top-level fields, parameters in declaration order, then the endpoint template), so the caller
//! can show them all at once.

use crate::spec::ToolSpec;
use crate::template::{EndpointTemplate, UnreferencedParams};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// `name`, `description` or `endpoint` is empty.
    IncompleteSpec,
    /// Tool name is not a bare identifier.
    InvalidName,
    EmptyParameterName,
    DuplicateParameter,
    MalformedTemplate,
    UnknownPlaceholder,
    OptionalPathParameter,
    UnreferencedParameter,
    InvalidEndpoint,
}

impl IssueKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::IncompleteSpec => "incomplete-spec",
            IssueKind::InvalidName => "invalid-name",
            IssueKind::EmptyParameterName => "empty-parameter-name",
            IssueKind::DuplicateParameter => "duplicate-parameter",
            IssueKind::MalformedTemplate => "malformed-template",
            IssueKind::UnknownPlaceholder => "unknown-placeholder",
            IssueKind::OptionalPathParameter => "optional-path-parameter",
            IssueKind::UnreferencedParameter => "unreferenced-parameter",
            IssueKind::InvalidEndpoint => "invalid-endpoint",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
    /// Parameter (or placeholder) the issue is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl ValidationIssue {
    #[must_use]
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            parameter: None,
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Split into the warnings (on success) or a [`ValidationFailure`].
    ///
    /// # Errors
    ///
    /// Returns the failure if any error was recorded.
    pub fn into_result(self) -> std::result::Result<Vec<ValidationIssue>, ValidationFailure> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ValidationFailure {
                errors: self.errors,
                warnings: self.warnings,
            })
        }
    }
}

/// A report with at least one error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s)", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Check a spec for everything that must hold before generation.
#[must_use]
pub fn validate(spec: &ToolSpec, policy: UnreferencedParams) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_top_level(spec, &mut report);
    check_parameters(spec, &mut report);

    if !spec.endpoint.trim().is_empty() {
        match EndpointTemplate::parse(&spec.endpoint) {
            Ok(template) => template.check(&spec.parameters, policy, &mut report),
            Err(issue) => report.errors.push(issue),
        }
    }

    debug!(
        tool = %spec.name,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated tool spec"
    );
    report
}

/// `[A-Za-z_][A-Za-z0-9_]*`
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_top_level(spec: &ToolSpec, report: &mut ValidationReport) {
    if spec.name.trim().is_empty() {
        report.errors.push(ValidationIssue::new(
            IssueKind::IncompleteSpec,
            "Tool name is required",
        ));
    } else if !is_identifier(&spec.name) {
        report.errors.push(ValidationIssue::new(
            IssueKind::InvalidName,
            format!(
                "Tool name '{}' must start with a letter or '_' and contain only letters, digits and '_'",
                spec.name
            ),
        ));
    }

    if spec.description.trim().is_empty() {
        report.errors.push(ValidationIssue::new(
            IssueKind::IncompleteSpec,
            "Tool description is required",
        ));
    }

    if spec.endpoint.trim().is_empty() {
        report.errors.push(ValidationIssue::new(
            IssueKind::IncompleteSpec,
            "API endpoint is required",
        ));
    }
}

fn check_parameters(spec: &ToolSpec, report: &mut ValidationReport) {
    let mut names: HashSet<&str> = HashSet::new();

    for (index, param) in spec.parameters.iter().enumerate() {
        if param.name.trim().is_empty() {
            report.errors.push(ValidationIssue::new(
                IssueKind::EmptyParameterName,
                format!("Parameter #{} has no name", index + 1),
            ));
            continue;
        }
        if !names.insert(param.name.as_str()) {
            report.errors.push(
                ValidationIssue::new(
                    IssueKind::DuplicateParameter,
                    format!("Duplicate parameter '{}'", param.name),
                )
                .with_parameter(&param.name),
            );
        }
    }
}
