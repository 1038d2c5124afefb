//! JSON-RPC protocol representations and formatting utilities
//!
//! Provides standardized mapping of internal AppErrors to valid JSON-RPC payloads.

use serde_json::{json, Value};

use crate::errors::AppError;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
pub const TOOL_EXECUTION_FAILED: i64 = -32000;
pub const PAYLOAD_TOO_LARGE: i64 = -32001;
pub const PAYLOAD_TOO_COMPLEX: i64 = -32002;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn app_error_to_json_rpc(id: Value, err: &AppError) -> Value {
    match err {
        AppError::PayloadTooLarge { .. } => {
            json_rpc_error(id, PAYLOAD_TOO_LARGE, &err.to_string())
        }
        AppError::MalformedJson { .. } => json_rpc_error(id, PARSE_ERROR, &err.to_string()),
        AppError::PayloadTooComplex { .. } => {
            json_rpc_error(id, PAYLOAD_TOO_COMPLEX, &err.to_string())
        }
        AppError::InvalidRequest => json_rpc_error(id, INVALID_REQUEST, &err.to_string()),
        AppError::MethodNotFound { .. } => {
            json_rpc_error(id, METHOD_NOT_FOUND, &err.to_string())
        }
        AppError::ToolNotFound { name } => json_rpc_error_with_data(
            id,
            METHOD_NOT_FOUND,
            "Method not found",
            json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": { "name": name },
            }),
        ),
        AppError::InvalidToolArguments { message } => json_rpc_error_with_data(
            id,
            INVALID_PARAMS,
            "Invalid params",
            json!({
                "code": "invalid_arguments",
                "message": message,
                "details": {},
            }),
        ),
        AppError::ToolExecutionFailed { public_message, .. } => {
            json_rpc_error(id, TOOL_EXECUTION_FAILED, public_message)
        }
    }
}

pub fn json_rpc_error(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message,
        }
    })
}

pub fn json_rpc_error_with_data(id: Value, code: i64, message: &str, data: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message,
            "data": data,
        }
    })
}

pub fn json_rpc_result(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_envelope_echoes_id() {
        let response = json_rpc_result(json!("abc"), json!({"ok": true}));

        assert_eq!(response["jsonrpc"], json!("2.0"));
        assert_eq!(response["id"], json!("abc"));
        assert_eq!(response["result"]["ok"], json!(true));
        assert!(response.get("error").is_none());
    }

    #[test]
    fn error_envelope_never_carries_result() {
        let response = json_rpc_error(Value::Null, METHOD_NOT_FOUND, "Method not found: x");

        assert!(response.get("result").is_none());
        assert_eq!(response["error"]["code"], json!(METHOD_NOT_FOUND));
        assert!(is_json_rpc_error(&response));
    }

    #[test]
    fn tool_not_found_maps_to_method_not_found_with_data() {
        let response =
            app_error_to_json_rpc(json!(1), &AppError::tool_not_found("nonexistent_tool"));

        assert_eq!(response["error"]["code"], json!(METHOD_NOT_FOUND));
        assert_eq!(response["error"]["data"]["code"], json!("tool_not_found"));
        assert_eq!(
            response["error"]["data"]["details"]["name"],
            json!("nonexistent_tool")
        );
    }

    #[test]
    fn complexity_rejection_hides_internal_detail() {
        let error = AppError::too_complex("array length 9000 exceeds 1024 at $.params.threats");
        let response = app_error_to_json_rpc(Value::Null, &error);

        assert_eq!(response["error"]["code"], json!(PAYLOAD_TOO_COMPLEX));
        let body = response.to_string();
        assert!(!body.contains("threats"));
        assert!(!body.contains("9000"));
    }

    #[test]
    fn execution_failure_carries_only_public_message() {
        let error = AppError::ToolExecutionFailed {
            error_id: "deadbeef".to_string(),
            public_message: "An internal error occurred. Error ID: deadbeef".to_string(),
        };
        let response = app_error_to_json_rpc(json!(7), &error);

        assert_eq!(response["error"]["code"], json!(TOOL_EXECUTION_FAILED));
        assert_eq!(
            response["error"]["message"],
            json!("An internal error occurred. Error ID: deadbeef")
        );
    }
}
