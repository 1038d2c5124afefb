//! The central JSON-RPC method router
//!
//! Interprets one decoded request envelope, dispatches to `initialize`,
//! `tools/list`, or `tools/call`, and always produces a response envelope.
//! Every branch is exception-safe: handler failures and panics are converted
//! through the error sanitizer at this boundary.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Value};
use tracing::info;

use crate::errors::{sanitize_error, AppError};
use crate::mcp::rpc::{app_error_to_json_rpc, is_json_rpc_error, json_rpc_result};
use crate::registry::{ToolDescriptor, ToolError};
use crate::AppState;

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2025-03-26";

const SERVER_INSTRUCTIONS: &str =
    "Professional threat modeling server using the STRIDE methodology.";

/// Routes a decoded JSON payload to the matching method handler. Stateless
/// across requests; a request without an `id` is answered with `id: null`
/// rather than suppressed.
pub fn handle_json_rpc_value(state: &AppState, payload: &Value) -> Value {
    let Some(envelope) = payload.as_object() else {
        return app_error_to_json_rpc(Value::Null, &AppError::InvalidRequest);
    };

    let id = envelope.get("id").cloned().unwrap_or(Value::Null);
    let method = match envelope.get("method").and_then(Value::as_str) {
        Some(method) if !method.trim().is_empty() => method,
        _ => return app_error_to_json_rpc(id, &AppError::InvalidRequest),
    };
    let params = envelope.get("params");

    let audit_params = redact_audit_params(params);

    let response = match method {
        "initialize" => json_rpc_result(
            id,
            json!({
                "protocolVersion": SUPPORTED_PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "instructions": SERVER_INSTRUCTIONS,
            }),
        ),
        "tools/list" => json_rpc_result(
            id,
            json!({
                "tools": state
                    .registry
                    .iter()
                    .map(ToolDescriptor::descriptor_json)
                    .collect::<Vec<_>>(),
            }),
        ),
        "tools/call" => handle_tools_call(state, id, params),
        _ => app_error_to_json_rpc(id, &AppError::method_not_found(method)),
    };

    info!(
        method = %method,
        params = %audit_params,
        outcome = if is_json_rpc_error(&response) { "failure" } else { "success" },
        "rpc action audited"
    );

    response
}

/// The `tools/call` pipeline: lookup, structural argument validation,
/// panic-isolated invocation, result wrapping.
fn handle_tools_call(state: &AppState, id: Value, params: Option<&Value>) -> Value {
    let Some(params) = params.and_then(Value::as_object) else {
        return app_error_to_json_rpc(
            id,
            &AppError::invalid_arguments("params must be an object with a tool name"),
        );
    };

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return app_error_to_json_rpc(
            id,
            &AppError::invalid_arguments("params.name must be a string"),
        );
    };

    let arguments = match params.get("arguments") {
        None => json!({}),
        Some(value @ Value::Object(_)) => value.clone(),
        Some(_) => {
            return app_error_to_json_rpc(
                id,
                &AppError::invalid_arguments("params.arguments must be an object"),
            )
        }
    };

    let Some(descriptor) = state.registry.lookup(name) else {
        return app_error_to_json_rpc(id, &AppError::tool_not_found(name));
    };

    if let Err(violation) = descriptor.validate_arguments(&arguments) {
        return app_error_to_json_rpc(id, &AppError::invalid_arguments(violation));
    }

    let handler = descriptor.handler;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(arguments)));

    match outcome {
        Ok(Ok(result)) => json_rpc_result(id, wrap_tool_result(&result)),
        Ok(Err(ToolError::InvalidArguments(message))) => {
            app_error_to_json_rpc(id, &AppError::invalid_arguments(message))
        }
        Ok(Err(ToolError::Execution(detail))) => {
            let sanitized = sanitize_error(&detail, &format!("tool execution: {name}"));
            app_error_to_json_rpc(id, &AppError::from(sanitized))
        }
        Err(payload) => {
            let detail = panic_detail(payload.as_ref());
            let sanitized = sanitize_error(&detail, &format!("tool execution: {name}"));
            app_error_to_json_rpc(id, &AppError::from(sanitized))
        }
    }
}

/// Tool results go out as a single text content block: string results (the
/// report tool) verbatim, everything else pretty-printed JSON.
fn wrap_tool_result(result: &Value) -> Value {
    let text = match result {
        Value::String(text) => text.clone(),
        value => serde_json::to_string_pretty(value).expect("tool result serialization"),
    };

    json!({
        "content": [
            {
                "type": "text",
                "text": text,
            }
        ]
    })
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map(redact_audit_value).unwrap_or(Value::Null)
}

fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
        || normalized.contains("api_key")
        || normalized == "authorization"
        || normalized == "bearer"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::domain::tools::build_registry;
    use crate::mcp::rpc::{
        INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, TOOL_EXECUTION_FAILED,
    };
    use crate::registry::{ToolDescriptor, ToolError, ToolRegistry};
    use crate::validation::ValidationLimits;
    use crate::AppState;

    use super::*;

    fn state() -> AppState {
        AppState::new(
            Arc::new(build_registry().expect("registry builds")),
            ValidationLimits::default(),
        )
    }

    fn failing_handler(_arguments: Value) -> Result<Value, ToolError> {
        Err(ToolError::Execution(
            "attempt to divide by zero in scoring".to_string(),
        ))
    }

    fn panicking_handler(_arguments: Value) -> Result<Value, ToolError> {
        panic!("index out of bounds in handler");
    }

    fn state_with_broken_tools() -> AppState {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::new(
                    "failing_tool",
                    "always fails",
                    json!({"type": "object"}),
                    failing_handler,
                )
                .expect("schema compiles"),
            )
            .expect("register");
        registry
            .register(
                ToolDescriptor::new(
                    "panicking_tool",
                    "always panics",
                    json!({"type": "object"}),
                    panicking_handler,
                )
                .expect("schema compiles"),
            )
            .expect("register");
        AppState::new(Arc::new(registry), ValidationLimits::default())
    }

    #[test]
    fn initialize_reports_protocol_and_identity() {
        let request = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"});
        let response = handle_json_rpc_value(&state(), &request);

        assert_eq!(response["id"], json!(1));
        assert_eq!(
            response["result"]["protocolVersion"],
            json!(SUPPORTED_PROTOCOL_VERSION)
        );
        assert_eq!(
            response["result"]["capabilities"]["tools"]["listChanged"],
            json!(false)
        );
        assert_eq!(
            response["result"]["serverInfo"]["name"],
            json!(env!("CARGO_PKG_NAME"))
        );
    }

    #[test]
    fn tools_list_returns_every_registered_tool_once() {
        let state = state();
        let request = json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"});
        let response = handle_json_rpc_value(&state, &request);

        let tools = response["result"]["tools"].as_array().expect("tools array");
        assert_eq!(tools.len(), state.registry.len());

        let mut names: Vec<&str> = tools
            .iter()
            .map(|tool| tool["name"].as_str().expect("tool name"))
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), state.registry.len());
        assert!(tools
            .iter()
            .all(|tool| tool.get("inputSchema").is_some() && tool.get("description").is_some()));
    }

    #[test]
    fn tools_call_dispatches_to_named_tool_only() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "get_stride_threat_framework",
                "arguments": { "app_description": "Test web application" }
            }
        });
        let response = handle_json_rpc_value(&state(), &request);

        assert_eq!(response["id"], json!(3));
        let text = response["result"]["content"][0]["text"]
            .as_str()
            .expect("content text");
        let parsed: Value = serde_json::from_str(text).expect("tool output is JSON");
        assert!(parsed.get("stride_framework").is_some());
    }

    #[test]
    fn unknown_tool_reports_tool_not_found() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 12,
            "method": "tools/call",
            "params": { "name": "nonexistent_tool", "arguments": {} }
        });
        let response = handle_json_rpc_value(&state(), &request);

        assert_eq!(response["id"], json!(12));
        assert_eq!(response["error"]["code"], json!(METHOD_NOT_FOUND));
        assert_eq!(response["error"]["data"]["code"], json!("tool_not_found"));
    }

    #[test]
    fn schema_violation_reports_invalid_params() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {
                "name": "get_stride_threat_framework",
                "arguments": {}
            }
        });
        let response = handle_json_rpc_value(&state(), &request);

        assert_eq!(response["error"]["code"], json!(INVALID_PARAMS));
        let message = response["error"]["data"]["message"]
            .as_str()
            .expect("violation message");
        assert!(message.contains("app_description"), "got: {message}");
    }

    #[test]
    fn unknown_method_reports_method_not_found() {
        let request = json!({"jsonrpc": "2.0", "id": 11, "method": "invalid/method"});
        let response = handle_json_rpc_value(&state(), &request);

        assert_eq!(response["error"]["code"], json!(METHOD_NOT_FOUND));
        assert_eq!(
            response["error"]["message"],
            json!("Method not found: invalid/method")
        );
    }

    #[test]
    fn non_object_payload_is_invalid_request_with_null_id() {
        let response = handle_json_rpc_value(&state(), &json!([1, 2, 3]));

        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], json!(INVALID_REQUEST));
    }

    #[test]
    fn missing_id_is_answered_with_null_id() {
        let request = json!({"jsonrpc": "2.0", "method": "tools/list"});
        let response = handle_json_rpc_value(&state(), &request);

        assert_eq!(response["id"], Value::Null);
        assert!(response.get("result").is_some());
    }

    #[test]
    fn execution_failure_is_sanitized() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "failing_tool", "arguments": {} }
        });
        let response = handle_json_rpc_value(&state_with_broken_tools(), &request);

        assert_eq!(response["error"]["code"], json!(TOOL_EXECUTION_FAILED));
        let body = response.to_string();
        assert!(!body.contains("divide"));
        assert!(!body.contains("zero"));
        assert!(body.contains("Error ID:"));
    }

    #[test]
    fn handler_panic_is_caught_and_sanitized() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "panicking_tool", "arguments": {} }
        });
        let response = handle_json_rpc_value(&state_with_broken_tools(), &request);

        assert_eq!(response["id"], json!(6));
        assert_eq!(response["error"]["code"], json!(TOOL_EXECUTION_FAILED));
        let body = response.to_string();
        assert!(!body.contains("index out of bounds"));
        assert!(body.contains("Error ID:"));
    }

    #[test]
    fn identical_requests_produce_identical_responses() {
        let state = state();
        let request = json!({"jsonrpc": "2.0", "id": 9, "method": "tools/list"});

        let first = handle_json_rpc_value(&state, &request);
        let second = handle_json_rpc_value(&state, &request);
        assert_eq!(first, second);
    }

    #[test]
    fn string_ids_are_echoed_verbatim() {
        let request = json!({"jsonrpc": "2.0", "id": "req-77", "method": "initialize"});
        let response = handle_json_rpc_value(&state(), &request);

        assert_eq!(response["id"], json!("req-77"));
    }

    #[test]
    fn redacts_sensitive_fields_in_audit_params() {
        let params = json!({
            "name": "get_stride_threat_framework",
            "arguments": {
                "app_description": "payments app",
                "api_key": "should-not-appear",
                "nested": { "secret": "should-not-appear" }
            }
        });

        let redacted = redact_audit_params(Some(&params));

        assert_eq!(redacted["name"], json!("get_stride_threat_framework"));
        assert_eq!(redacted["arguments"]["app_description"], json!("payments app"));
        assert_eq!(redacted["arguments"]["api_key"], json!("[REDACTED]"));
        assert_eq!(redacted["arguments"]["nested"]["secret"], json!("[REDACTED]"));
    }
}
