//! Endpoint URL templates (`https://api.example.com/users/{id}`).
//!
//! Placeholders are `{name}` tokens referencing declared parameters. The validator only certifies
//! that the template and the parameter list agree; it never rewrites the template.

use crate::spec::Parameter;
use crate::validation::{IssueKind, ValidationIssue, ValidationReport};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use url::Url;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid placeholder regex"));

/// Text substituted for every placeholder when checking that the endpoint is a usable URL.
const SAMPLE_VALUE: &str = "sample";

/// What to do with declared parameters that no placeholder references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnreferencedParams {
    /// Fail validation.
    #[default]
    Reject,
    /// Forward the value as a query-string parameter.
    Query,
    /// Accept the value but never send it upstream.
    Ignore,
}

impl UnreferencedParams {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UnreferencedParams::Reject => "reject",
            UnreferencedParams::Query => "query",
            UnreferencedParams::Ignore => "ignore",
        }
    }
}

impl fmt::Display for UnreferencedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnreferencedParams {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(UnreferencedParams::Reject),
            "query" => Ok(UnreferencedParams::Query),
            "ignore" => Ok(UnreferencedParams::Ignore),
            other => Err(format!(
                "unknown policy '{other}' (expected 'reject', 'query' or 'ignore')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    raw: String,
    /// Distinct placeholder names, in order of first appearance.
    placeholders: Vec<String>,
}

impl EndpointTemplate {
    /// Scan `endpoint` for `{name}` placeholders.
    ///
    /// # Errors
    ///
    /// Returns a `malformed-template` issue for empty placeholders (`{}`), placeholders containing
    /// whitespace, or unbalanced braces.
    pub fn parse(endpoint: &str) -> std::result::Result<Self, ValidationIssue> {
        let mut placeholders: Vec<String> = Vec::new();

        for cap in PLACEHOLDER_RE.captures_iter(endpoint) {
            let name = &cap[1];
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ValidationIssue::new(
                    IssueKind::MalformedTemplate,
                    format!("Endpoint contains an invalid placeholder '{}'", &cap[0]),
                ));
            }
            if !placeholders.iter().any(|p| p == name) {
                placeholders.push(name.to_string());
            }
        }

        let stripped = PLACEHOLDER_RE.replace_all(endpoint, "");
        if stripped.contains(['{', '}']) {
            return Err(ValidationIssue::new(
                IssueKind::MalformedTemplate,
                format!("Endpoint '{endpoint}' has unbalanced '{{' or '}}'"),
            ));
        }

        Ok(Self {
            raw: endpoint.to_string(),
            placeholders,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    #[must_use]
    pub fn references(&self, name: &str) -> bool {
        self.placeholders.iter().any(|p| p == name)
    }

    /// Substitute every placeholder with `value` (no encoding).
    #[must_use]
    pub fn fill(&self, value: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.raw, regex::NoExpand(value))
            .into_owned()
    }

    /// Compare placeholders against the declared parameters and record issues in `report`.
    ///
    /// Issues are recorded as: placeholders in order of appearance, then unreferenced parameters
    /// in declaration order, then the URL shape check.
    pub(crate) fn check(
        &self,
        parameters: &[Parameter],
        policy: UnreferencedParams,
        report: &mut ValidationReport,
    ) {
        let declared: Vec<&str> = parameters
            .iter()
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
            .collect();

        for placeholder in &self.placeholders {
            match parameters.iter().find(|p| &p.name == placeholder) {
                None => {
                    let mut message =
                        format!("Endpoint placeholder '{{{placeholder}}}' has no matching parameter");
                    if let Some(s) = find_similar_strings(placeholder, &declared).first() {
                        message.push_str(&format!(" (did you mean '{s}'?)"));
                    }
                    report.errors.push(
                        ValidationIssue::new(IssueKind::UnknownPlaceholder, message)
                            .with_parameter(placeholder),
                    );
                }
                Some(p) if !p.required => {
                    report.errors.push(
                        ValidationIssue::new(
                            IssueKind::OptionalPathParameter,
                            format!(
                                "Parameter '{placeholder}' is used in the endpoint path and must be required"
                            ),
                        )
                        .with_parameter(placeholder),
                    );
                }
                Some(_) => {}
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for &name in &declared {
            if !seen.insert(name) || self.references(name) {
                continue;
            }
            let issue = |message: String| {
                ValidationIssue::new(IssueKind::UnreferencedParameter, message).with_parameter(name)
            };
            match policy {
                UnreferencedParams::Reject => report.errors.push(issue(format!(
                    "Parameter '{name}' is not referenced in the endpoint"
                ))),
                UnreferencedParams::Query => report.warnings.push(issue(format!(
                    "Parameter '{name}' is not referenced in the endpoint; it will be sent as a query parameter"
                ))),
                UnreferencedParams::Ignore => report.warnings.push(issue(format!(
                    "Parameter '{name}' is not referenced in the endpoint; it will not be sent upstream"
                ))),
            }
        }

        if let Err(message) = check_url_shape(&self.fill(SAMPLE_VALUE)) {
            report
                .errors
                .push(ValidationIssue::new(IssueKind::InvalidEndpoint, message));
        }
    }
}

fn check_url_shape(candidate: &str) -> std::result::Result<(), String> {
    let url =
        Url::parse(candidate).map_err(|e| format!("Endpoint is not a valid absolute URL: {e}"))?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!("Endpoint uses unsupported URL scheme '{scheme}'"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("Endpoint is missing a host".to_string());
    }
    Ok(())
}

fn find_similar_strings(unknown: &str, known: &[&str]) -> Vec<String> {
    let mut candidates: Vec<(f64, String)> = Vec::new();
    for k in known {
        let score = strsim::jaro(unknown, k);
        if score > 0.7 {
            candidates.push((score, (*k).to_string()));
        }
    }
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    candidates.into_iter().map(|(_, s)| s).collect()
}
