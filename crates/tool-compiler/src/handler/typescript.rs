//! Express + axios handler target.

use super::{
    FETCH_FAILED_MESSAGE, HandlerPlan, HandlerTemplate, MISSING_PARAM_PREFIX, render_template,
};

const TEMPLATE: &str = r#"import { Request, Response } from "express";
import axios from "axios";

/**
 * MCP Tool Metadata
 */
export const %%TOOL%%Tool = %%DESCRIPTOR%%;

const ENDPOINT: string = %%ENDPOINT%%;
const PATH_PARAMS: string[] = %%PATH_PARAMS%%;
const QUERY_PARAMS: string[] = %%QUERY_PARAMS%%;

function isMissing(value: unknown): boolean {
  return value === undefined || value === null || value === "";
}

/**
 * Tool Handler for Public GET API
 */
export const %%TOOL%%Handler = async (req: Request, res: Response) => {
  const params = req.body ?? {};

  // Validate required parameters
  for (const key of %%TOOL%%Tool.inputSchema.required) {
    if (isMissing(params[key])) {
      return res.status(400).json({ error: `%%MISSING_PREFIX%%${key}` });
    }
  }

  try {
    // Construct the API endpoint
    let apiUrl = ENDPOINT;
    for (const key of PATH_PARAMS) {
      apiUrl = apiUrl.split(`{${key}}`).join(encodeURIComponent(String(params[key])));
    }

    const query = new URLSearchParams();
    for (const key of QUERY_PARAMS) {
      if (!isMissing(params[key])) {
        query.append(key, String(params[key]));
      }
    }
    const queryString = query.toString();
    if (queryString) {
      apiUrl += (apiUrl.includes("?") ? "&" : "?") + queryString;
    }

    const response = await axios.get(apiUrl);

    return res.json(response.data);
  } catch (error: any) {
    return res.status(500).json({
      error: %%FETCH_FAILED%%,
      details: error.message,
    });
  }
};
"#;

/// Emits an Express request handler that proxies through axios.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptExpressTemplate;

impl HandlerTemplate for TypeScriptExpressTemplate {
    fn file_name(&self, tool_name: &str) -> String {
        format!("{tool_name}.tool.ts")
    }

    fn render(&self, plan: &HandlerPlan) -> String {
        let descriptor = plan.descriptor.to_json_pretty();
        let endpoint = js_string(&plan.endpoint);
        let path_params = js_string_array(&plan.path_params);
        let query_params = js_string_array(&plan.query_params);
        let fetch_failed = js_string(FETCH_FAILED_MESSAGE);

        render_template(
            TEMPLATE,
            &[
                ("TOOL", plan.tool_name.as_str()),
                ("DESCRIPTOR", descriptor.trim_end()),
                ("ENDPOINT", endpoint.as_str()),
                ("PATH_PARAMS", path_params.as_str()),
                ("QUERY_PARAMS", query_params.as_str()),
                ("MISSING_PREFIX", MISSING_PARAM_PREFIX),
                ("FETCH_FAILED", fetch_failed.as_str()),
            ],
        )
    }
}

/// JSON string literals are valid JavaScript string literals.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

fn js_string_array(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ToolDescriptor;
    use crate::schema::InputSchema;
    use crate::spec::{ParamType, Parameter};
    use crate::template::{EndpointTemplate, UnreferencedParams};

    fn plan(endpoint: &str, params: &[Parameter], policy: UnreferencedParams) -> HandlerPlan {
        let schema = InputSchema::build(params);
        let descriptor = ToolDescriptor {
            name: "getPokemonByName".to_string(),
            description: "Get information about a \"Pokemon\" by its name".to_string(),
            input_schema: schema.to_value(),
        };
        let template = EndpointTemplate::parse(endpoint).expect("template");
        HandlerPlan::new(&descriptor, &schema, &template, policy)
    }

    #[test]
    fn renders_express_handler() {
        let params = [Parameter::new("name", ParamType::String)
            .required(true)
            .description("Pokemon name or ID")];
        let plan = plan(
            "https://pokeapi.co/api/v2/pokemon/{name}",
            &params,
            UnreferencedParams::Reject,
        );
        let src = TypeScriptExpressTemplate.render(&plan);

        assert!(src.contains("export const getPokemonByNameTool = {\n  \"name\": \"getPokemonByName\","));
        assert!(src.contains("export const getPokemonByNameHandler = async (req: Request, res: Response) => {"));
        assert!(src.contains("for (const key of getPokemonByNameTool.inputSchema.required) {"));
        assert!(src.contains("return res.status(400).json({ error: `Missing parameter: ${key}` });"));
        assert!(src.contains("const ENDPOINT: string = \"https://pokeapi.co/api/v2/pokemon/{name}\";"));
        assert!(src.contains("const PATH_PARAMS: string[] = [\"name\"];"));
        assert!(src.contains("const QUERY_PARAMS: string[] = [];"));
        assert!(src.contains("error: \"Failed to fetch data from external API\","));
        assert!(src.contains("details: error.message,"));
        assert!(src.contains("Get information about a \\\"Pokemon\\\" by its name"));
        assert!(!src.contains("%%"));
    }

    #[test]
    fn query_policy_lists_unreferenced_params() {
        let params = [
            Parameter::new("name", ParamType::String).required(true),
            Parameter::new("lang", ParamType::String),
        ];
        let plan = plan(
            "https://pokeapi.co/api/v2/pokemon/{name}",
            &params,
            UnreferencedParams::Query,
        );
        let src = TypeScriptExpressTemplate.render(&plan);
        assert!(src.contains("const QUERY_PARAMS: string[] = [\"lang\"];"));
    }

    #[test]
    fn file_name_follows_tool_name() {
        assert_eq!(
            TypeScriptExpressTemplate.file_name("getPokemonByName"),
            "getPokemonByName.tool.ts"
        );
    }
}
