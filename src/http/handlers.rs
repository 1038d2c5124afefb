//! Axum HTTP handlers for the web server
//!
//! Terminates HTTP for the JSON-RPC endpoint: payload validation before
//! routing, transport-level policy headers, and static metadata endpoints.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::mcp::rpc::app_error_to_json_rpc;
use crate::mcp::server::handle_json_rpc_value;
use crate::validation::validate_payload;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Static server metadata. No router involvement.
pub async fn discovery(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Professional threat modeling server using the STRIDE methodology",
        "tools": state.registry.names(),
        "endpoints": {
            "POST /": "MCP JSON-RPC endpoint"
        }
    }))
}

/// CORS preflight target; the cors layer supplies the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// The single JSON-RPC endpoint. Validation failures short-circuit with a
/// 4xx status but always a JSON-RPC-shaped body; everything that reaches the
/// router answers 200.
pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = match validate_payload(&body, &state.limits) {
        Ok(value) => value,
        Err(failure) => {
            warn!(
                kind = %failure.error,
                detail = failure.error.internal_detail().unwrap_or(""),
                "payload validation rejected request"
            );
            let status = match failure.error {
                AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return (
                status,
                Json(app_error_to_json_rpc(failure.request_id, &failure.error)),
            )
                .into_response();
        }
    };

    if !is_valid_envelope(&payload) {
        let id = payload.get("id").cloned().unwrap_or(Value::Null);
        return (
            StatusCode::BAD_REQUEST,
            Json(app_error_to_json_rpc(id, &AppError::InvalidRequest)),
        )
            .into_response();
    }

    let response = handle_json_rpc_value(&state, &payload);
    (StatusCode::OK, Json(response)).into_response()
}

fn is_valid_envelope(payload: &Value) -> bool {
    let Some(envelope) = payload.as_object() else {
        return false;
    };

    envelope.get("jsonrpc").and_then(Value::as_str) == Some("2.0")
        && envelope
            .get("method")
            .and_then(Value::as_str)
            .is_some_and(|method| !method.trim().is_empty())
}

/// Applied to every response regardless of path or outcome.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );

    response
}
