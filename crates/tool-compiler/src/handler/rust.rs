//! axum + reqwest handler target.

use super::{
    FETCH_FAILED_MESSAGE, HandlerPlan, HandlerTemplate, MISSING_PARAM_PREFIX, render_template,
};
use heck::{ToShoutySnakeCase as _, ToSnakeCase as _};

const TEMPLATE: &str = r#"//! Generated MCP tool `%%TOOL%%`.
//!
//! Dependencies: axum, percent-encoding, reqwest, serde_json.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value, json};

/// MCP tool metadata (JSON).
pub const %%CONST%%_TOOL: &str = %%DESCRIPTOR%%;

const ENDPOINT: &str = %%ENDPOINT%%;
const REQUIRED_PARAMS: &[&str] = %%REQUIRED%%;
const PATH_PARAMS: &[&str] = %%PATH_PARAMS%%;
const QUERY_PARAMS: &[&str] = %%QUERY_PARAMS%%;

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn param_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Tool handler for the public GET API.
pub async fn %%FN%%_handler(Json(params): Json<Map<String, Value>>) -> Response {
    for key in REQUIRED_PARAMS {
        if is_missing(params.get(*key)) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("%%MISSING_PREFIX%%{key}") })),
            )
                .into_response();
        }
    }

    let mut api_url = ENDPOINT.to_string();
    for key in PATH_PARAMS {
        let value = param_text(params.get(*key));
        let encoded = utf8_percent_encode(&value, NON_ALPHANUMERIC).to_string();
        api_url = api_url.replace(&format!("{{{key}}}"), &encoded);
    }

    let query: Vec<(&str, String)> = QUERY_PARAMS
        .iter()
        .filter(|key| !is_missing(params.get(**key)))
        .map(|key| (*key, param_text(params.get(*key))))
        .collect();

    match fetch(&api_url, &query).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": %%FETCH_FAILED%%,
                "details": e.to_string(),
            })),
        )
            .into_response(),
    }
}

async fn fetch(url: &str, query: &[(&str, String)]) -> Result<Value, reqwest::Error> {
    let response = reqwest::Client::new()
        .get(url)
        .query(query)
        .send()
        .await?
        .error_for_status()?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
"#;

/// Emits an axum handler that proxies through reqwest.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustAxumTemplate;

impl HandlerTemplate for RustAxumTemplate {
    fn file_name(&self, tool_name: &str) -> String {
        format!("{}_tool.rs", snake_ident(tool_name))
    }

    fn render(&self, plan: &HandlerPlan) -> String {
        let fn_name = snake_ident(&plan.tool_name);
        let const_name = fn_name.to_shouty_snake_case();
        let descriptor = rust_string(&plan.descriptor.to_json_compact());
        let endpoint = rust_string(&plan.endpoint);
        let required = rust_str_slice(&plan.required);
        let path_params = rust_str_slice(&plan.path_params);
        let query_params = rust_str_slice(&plan.query_params);
        let fetch_failed = rust_string(FETCH_FAILED_MESSAGE);

        render_template(
            TEMPLATE,
            &[
                ("TOOL", plan.tool_name.as_str()),
                ("FN", fn_name.as_str()),
                ("CONST", const_name.as_str()),
                ("DESCRIPTOR", descriptor.as_str()),
                ("ENDPOINT", endpoint.as_str()),
                ("REQUIRED", required.as_str()),
                ("PATH_PARAMS", path_params.as_str()),
                ("QUERY_PARAMS", query_params.as_str()),
                ("MISSING_PREFIX", MISSING_PARAM_PREFIX),
                ("FETCH_FAILED", fetch_failed.as_str()),
            ],
        )
    }
}

/// snake_case form of a tool name that is still a valid Rust identifier.
fn snake_ident(tool_name: &str) -> String {
    let snake = tool_name.to_snake_case();
    if snake.starts_with(|c: char| c.is_ascii_alphabetic()) {
        snake
    } else {
        format!("tool_{snake}")
    }
}

/// `Debug` output of a `str` is a valid Rust string literal.
fn rust_string(s: &str) -> String {
    format!("{s:?}")
}

fn rust_str_slice(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| rust_string(s)).collect();
    format!("&[{}]", inner.join(", "))
}
