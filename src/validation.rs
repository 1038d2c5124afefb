//! Structural validation of untrusted request payloads
//!
//! Bounds the size and shape of inbound JSON before any business logic runs,
//! so the work spent on a hostile request is O(limits) regardless of content.

use serde_json::Value;

use crate::errors::AppError;

/// Process-wide payload bounds. Built once at startup and passed explicitly;
/// tests construct alternate sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_payload_bytes: usize,
    pub max_json_depth: usize,
    pub max_object_keys: usize,
    pub max_array_length: usize,
    pub max_string_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_payload_bytes: 5 * 1024 * 1024,
            max_json_depth: 32,
            max_object_keys: 256,
            max_array_length: 1024,
            max_string_length: 65_536,
        }
    }
}

/// A rejected payload: the reason (with internal-only detail) plus the
/// request id recovered from the document when one was parseable, so the
/// transport can echo it.
#[derive(Debug)]
pub struct ValidationFailure {
    pub error: AppError,
    pub request_id: Value,
}

impl ValidationFailure {
    fn without_id(error: AppError) -> Self {
        Self {
            error,
            request_id: Value::Null,
        }
    }
}

/// Validates raw bytes into parsed JSON, rejecting oversized, malformed, or
/// overly complex payloads. Pure function over its input.
pub fn validate_payload(
    raw: &[u8],
    limits: &ValidationLimits,
) -> Result<Value, ValidationFailure> {
    if raw.len() > limits.max_payload_bytes {
        return Err(ValidationFailure::without_id(AppError::PayloadTooLarge {
            actual: raw.len(),
            limit: limits.max_payload_bytes,
        }));
    }

    let parsed: Value = serde_json::from_slice(raw).map_err(|err| {
        ValidationFailure::without_id(AppError::malformed_json(err.to_string()))
    })?;

    if let Err(violation) = check_complexity(&parsed, limits) {
        let request_id = parsed.get("id").cloned().unwrap_or(Value::Null);
        return Err(ValidationFailure {
            error: AppError::too_complex(violation),
            request_id,
        });
    }

    Ok(parsed)
}

/// One-pass recursive walk enforcing depth, key-count, array-length, and
/// string-length bounds. Short-circuits on the first violation; the returned
/// description names the constraint and path for server logs only.
fn check_complexity(value: &Value, limits: &ValidationLimits) -> Result<(), String> {
    walk(value, 0, &mut String::from("$"), limits)
}

fn walk(
    value: &Value,
    depth: usize,
    path: &mut String,
    limits: &ValidationLimits,
) -> Result<(), String> {
    if depth > limits.max_json_depth {
        return Err(format!(
            "nesting depth {depth} exceeds {max} at {path}",
            max = limits.max_json_depth
        ));
    }

    match value {
        Value::Object(map) => {
            if map.len() > limits.max_object_keys {
                return Err(format!(
                    "object key count {len} exceeds {max} at {path}",
                    len = map.len(),
                    max = limits.max_object_keys
                ));
            }
            for (key, item) in map {
                let rollback = path.len();
                path.push('.');
                path.push_str(key);
                walk(item, depth + 1, path, limits)?;
                path.truncate(rollback);
            }
        }
        Value::Array(items) => {
            if items.len() > limits.max_array_length {
                return Err(format!(
                    "array length {len} exceeds {max} at {path}",
                    len = items.len(),
                    max = limits.max_array_length
                ));
            }
            for (index, item) in items.iter().enumerate() {
                let rollback = path.len();
                path.push_str(&format!("[{index}]"));
                walk(item, depth + 1, path, limits)?;
                path.truncate(rollback);
            }
        }
        Value::String(text) => {
            if text.len() > limits.max_string_length {
                return Err(format!(
                    "string length {len} exceeds {max} at {path}",
                    len = text.len(),
                    max = limits.max_string_length
                ));
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }

    Ok(())
}
