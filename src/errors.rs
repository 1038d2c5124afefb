use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for the request-handling core.
///
/// Validation kinds never reach the router; router kinds carry no sensitive
/// detail by construction; `ToolExecutionFailed` only ever holds output of
/// the sanitizer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("payload size {actual} bytes exceeds maximum of {limit} bytes")]
    PayloadTooLarge { actual: usize, limit: usize },
    #[error("Parse error")]
    MalformedJson { detail: String },
    #[error("Payload complexity validation failed")]
    PayloadTooComplex { detail: String },
    #[error("Invalid Request")]
    InvalidRequest,
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },
    #[error("unknown tool: {name}")]
    ToolNotFound { name: String },
    #[error("invalid tool arguments: {message}")]
    InvalidToolArguments { message: String },
    #[error("{public_message}")]
    ToolExecutionFailed {
        error_id: String,
        public_message: String,
    },
}

impl AppError {
    pub fn malformed_json(detail: impl Into<String>) -> Self {
        Self::MalformedJson {
            detail: detail.into(),
        }
    }

    pub fn too_complex(detail: impl Into<String>) -> Self {
        Self::PayloadTooComplex {
            detail: detail.into(),
        }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidToolArguments {
            message: message.into(),
        }
    }

    /// Internal detail retained for server-side logs. Never serialized into
    /// a response.
    pub fn internal_detail(&self) -> Option<&str> {
        match self {
            Self::MalformedJson { detail } | Self::PayloadTooComplex { detail } => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedError {
    pub error_id: String,
    pub public_message: String,
}

/// Converts an arbitrary internal failure into a client-safe record.
///
/// The full detail goes to the server log under a fresh correlation token;
/// the returned message carries only that token. Total for any input.
pub fn sanitize_error(error: &dyn fmt::Display, context: &str) -> SanitizedError {
    let mut error_id = Uuid::new_v4().simple().to_string();
    error_id.truncate(8);

    tracing::error!(
        error_id = %error_id,
        context = %context,
        detail = %error,
        "internal error sanitized"
    );

    let public_message = format!("An internal error occurred. Error ID: {error_id}");
    SanitizedError {
        error_id,
        public_message,
    }
}

impl From<SanitizedError> for AppError {
    fn from(sanitized: SanitizedError) -> Self {
        Self::ToolExecutionFailed {
            error_id: sanitized.error_id,
            public_message: sanitized.public_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_produces_correlation_token() {
        let sanitized = sanitize_error(&"database exploded at /var/lib/secret", "test context");

        assert_eq!(sanitized.error_id.len(), 8);
        assert_eq!(
            sanitized.public_message,
            format!("An internal error occurred. Error ID: {}", sanitized.error_id)
        );
    }

    #[test]
    fn sanitize_never_echoes_detail() {
        let sanitized = sanitize_error(&"attempt to divide by zero", "tool execution: demo");

        assert!(!sanitized.public_message.contains("divide"));
        assert!(!sanitized.public_message.contains("zero"));
    }

    #[test]
    fn tokens_are_fresh_per_call() {
        let first = sanitize_error(&"same failure", "ctx");
        let second = sanitize_error(&"same failure", "ctx");

        assert_ne!(first.error_id, second.error_id);
    }

    #[test]
    fn internal_detail_stays_out_of_display() {
        let error = AppError::too_complex("array length 2000 exceeds 1024 at $.params.threats");

        assert_eq!(error.to_string(), "Payload complexity validation failed");
        assert!(error.internal_detail().expect("detail").contains("threats"));
    }
}
