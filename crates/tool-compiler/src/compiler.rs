//! Single-pass generation: validated [`ToolSpec`] -> descriptor + handler source.

use crate::descriptor::ToolDescriptor;
use crate::error::Result;
use crate::handler::{HandlerPlan, HandlerTarget};
use crate::schema::InputSchema;
use crate::spec::ToolSpec;
use crate::template::{EndpointTemplate, UnreferencedParams};
use crate::validation::{ValidationFailure, ValidationIssue, validate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Generation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Runtime the handler source is emitted for.
    #[serde(default)]
    pub target: HandlerTarget,

    /// Policy for declared parameters that the endpoint template never references.
    #[serde(default)]
    pub unreferenced: UnreferencedParams,
}

/// The two generated artifacts plus their conventional file names.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArtifacts {
    pub descriptor: ToolDescriptor,
    /// `descriptor` rendered as pretty JSON (what gets shown / downloaded).
    pub descriptor_json: String,
    pub descriptor_file_name: String,
    pub handler_source: String,
    pub handler_file_name: String,
    /// Non-blocking validation findings (e.g. parameters forwarded as query pairs).
    pub warnings: Vec<ValidationIssue>,
}

/// Validate `spec` and emit both artifacts.
///
/// Output is a pure function of `(spec, options)`: calling this twice on an unchanged spec yields
/// byte-identical artifacts.
///
/// # Errors
///
/// Returns [`crate::CompilerError::Invalid`] with every validation error if the spec is not ready
/// for generation. Emission itself cannot fail.
pub fn compile(spec: &ToolSpec, options: &CompileOptions) -> Result<ToolArtifacts> {
    let warnings = validate(spec, options.unreferenced).into_result()?;
    for w in &warnings {
        warn!(
            tool = %spec.name,
            parameter = w.parameter.as_deref().unwrap_or_default(),
            warning = %w.message,
            "tool spec warning"
        );
    }

    let template =
        EndpointTemplate::parse(&spec.endpoint).map_err(|issue| ValidationFailure {
            errors: vec![issue],
            warnings: Vec::new(),
        })?;

    let schema = InputSchema::build(&spec.parameters);
    let descriptor = ToolDescriptor::new(spec, &schema);
    let descriptor_json = descriptor.to_json_pretty();

    let handler = options.target.template();
    let plan = HandlerPlan::new(&descriptor, &schema, &template, options.unreferenced);
    let handler_source = handler.render(&plan);

    debug!(
        tool = %spec.name,
        target = %options.target,
        parameters = spec.parameters.len(),
        fingerprint = %descriptor.fingerprint(),
        "compiled tool"
    );

    Ok(ToolArtifacts {
        descriptor_file_name: format!("{}.tool.json", spec.name),
        handler_file_name: handler.file_name(&spec.name),
        descriptor,
        descriptor_json,
        handler_source,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompilerError;
    use crate::spec::{ParamType, Parameter};
    use crate::validation::IssueKind;
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

    #[test]
    fn pokemon_example_compiles() {
        let out = compile(&pokemon(), &CompileOptions::default()).expect("compiles");
        let v: Value = serde_json::from_str(&out.descriptor_json).expect("json");
        assert_eq!(v["inputSchema"]["required"], json!(["name"]));
        assert_eq!(v["inputSchema"]["properties"]["name"]["type"], "string");
        assert_eq!(out.descriptor_file_name, "getPokemonByName.tool.json");
        assert_eq!(out.handler_file_name, "getPokemonByName.tool.ts");
        assert!(out.handler_source.contains("Missing parameter: ${key}"));
        assert!(out.handler_source.contains("\"required\": [\n      \"name\"\n    ]"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn generation_is_deterministic() {
        for target in [HandlerTarget::TypeScript, HandlerTarget::Rust] {
            let options = CompileOptions {
                target,
                unreferenced: UnreferencedParams::Query,
            };
            let spec = pokemon().with_parameter(Parameter::new("limit", ParamType::Number));
            let a = compile(&spec, &options).expect("compiles");
            let b = compile(&spec, &options).expect("compiles");
            assert_eq!(a.descriptor_json, b.descriptor_json);
            assert_eq!(a.handler_source, b.handler_source);
        }
    }

    #[test]
    fn empty_parameter_list_still_compiles() {
        let spec = ToolSpec::new("listBerries", "List berries", "https://pokeapi.co/api/v2/berry");
        let out = compile(&spec, &CompileOptions::default()).expect("compiles");
        assert_eq!(
            out.descriptor.input_schema,
            json!({"type": "object", "properties": {}, "required": []})
        );
    }

    #[test]
    fn invalid_spec_reports_every_error() {
        let spec = ToolSpec::new("bad name", "", "https://x.test/{id}")
            .with_parameter(Parameter::new("q", ParamType::String))
            .with_parameter(Parameter::new("q", ParamType::Boolean));
        let err = compile(&spec, &CompileOptions::default()).unwrap_err();
        let failure = match err {
            CompilerError::Invalid(failure) => failure,
            other => panic!("expected validation failure, got {other}"),
        };
        let kinds: Vec<IssueKind> = failure.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::InvalidName,
                IssueKind::IncompleteSpec,
                IssueKind::DuplicateParameter,
                IssueKind::UnknownPlaceholder,
                IssueKind::UnreferencedParameter,
            ]
        );
    }

    #[test]
    fn unreferenced_parameter_under_query_policy_is_a_warning() {
        let spec = pokemon().with_parameter(Parameter::new("id", ParamType::String));

        let strict = compile(&spec, &CompileOptions::default()).unwrap_err();
        assert!(strict.to_string().contains("unreferenced-parameter"));

        let options = CompileOptions {
            target: HandlerTarget::TypeScript,
            unreferenced: UnreferencedParams::Query,
        };
        let out = compile(&spec, &options).expect("compiles");
        assert_eq!(out.warnings.len(), 1);
        assert!(out.handler_source.contains("const QUERY_PARAMS: string[] = [\"id\"];"));
    }

    #[test]
    fn rust_target_names_files_in_snake_case() {
        let options = CompileOptions {
            target: HandlerTarget::Rust,
            unreferenced: UnreferencedParams::Reject,
        };
        let out = compile(&pokemon(), &options).expect("compiles");
        assert_eq!(out.handler_file_name, "get_pokemon_by_name_tool.rs");
        assert!(out.handler_source.contains("get_pokemon_by_name_handler"));
    }

    #[test]
    fn options_deserialize_from_config() {
        let opts: CompileOptions =
            serde_json::from_str(r#"{"target":"rust","unreferenced":"query"}"#).expect("json");
        assert_eq!(opts.target, HandlerTarget::Rust);
        assert_eq!(opts.unreferenced, UnreferencedParams::Query);

        let opts: CompileOptions = serde_json::from_str("{}").expect("json");
        assert_eq!(opts, CompileOptions::default());
    }
}
