//! Closed registry of named tools
//!
//! Built once during process initialization, read-only afterwards. Lookup by
//! name is a data miss, never a dispatch error, and each descriptor carries
//! its input schema compiled for structural argument validation.

use jsonschema::Validator;
use serde_json::{json, Value};
use thiserror::Error;

/// Typed failures a tool handler may return. `InvalidArguments` is reported
/// to the caller as an invalid-params error; `Execution` is sanitized before
/// it leaves the process.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Execution(String),
}

/// Pure function from an `arguments` object to a tool result. Handlers must
/// not perform I/O and must stay deterministic.
pub type ToolHandler = fn(Value) -> Result<Value, ToolError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool {name} is already registered")]
    DuplicateTool { name: &'static str },
    #[error("input schema for tool {name} does not compile: {detail}")]
    InvalidSchema { name: &'static str, detail: String },
}

pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    validator: Validator,
    pub handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new(
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        handler: ToolHandler,
    ) -> Result<Self, RegistryError> {
        let validator =
            jsonschema::validator_for(&input_schema).map_err(|err| RegistryError::InvalidSchema {
                name,
                detail: err.to_string(),
            })?;

        Ok(Self {
            name,
            description,
            input_schema,
            validator,
            handler,
        })
    }

    /// Structural check of `arguments` against the declared schema. Returns
    /// the first violation as a client-safe description.
    pub fn validate_arguments(&self, arguments: &Value) -> Result<(), String> {
        match self.validator.iter_errors(arguments).next() {
            None => Ok(()),
            Some(error) => {
                let path = error.instance_path().to_string();
                if path.is_empty() {
                    Err(error.to_string())
                } else {
                    Err(format!("{path}: {error}"))
                }
            }
        }
    }

    /// Wire representation for `tools/list` and discovery.
    pub fn descriptor_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema,
        })
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startup-only registration; rejects duplicate names.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        if self.lookup(descriptor.name).is_some() {
            return Err(RegistryError::DuplicateTool {
                name: descriptor.name,
            });
        }
        self.tools.push(descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_handler(arguments: Value) -> Result<Value, ToolError> {
        Ok(json!({ "echo": arguments }))
    }

    fn sample_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "label": { "type": "string" }
            },
            "required": ["label"]
        })
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::new("echo", "echoes arguments", sample_schema(), echo_handler)
                    .expect("schema compiles"),
            )
            .expect("register");

        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::new("echo", "first", sample_schema(), echo_handler)
                    .expect("schema compiles"),
            )
            .expect("register");

        let error = registry
            .register(
                ToolDescriptor::new("echo", "second", sample_schema(), echo_handler)
                    .expect("schema compiles"),
            )
            .expect_err("duplicate must fail");
        assert!(matches!(error, RegistryError::DuplicateTool { name: "echo" }));
    }

    #[test]
    fn validate_arguments_reports_missing_required_field() {
        let descriptor =
            ToolDescriptor::new("echo", "echoes arguments", sample_schema(), echo_handler)
                .expect("schema compiles");

        let violation = descriptor
            .validate_arguments(&json!({}))
            .expect_err("missing field must fail");
        assert!(violation.contains("label"), "got: {violation}");
    }

    #[test]
    fn validate_arguments_reports_wrong_type_with_path() {
        let descriptor =
            ToolDescriptor::new("echo", "echoes arguments", sample_schema(), echo_handler)
                .expect("schema compiles");

        let violation = descriptor
            .validate_arguments(&json!({ "label": 7 }))
            .expect_err("wrong type must fail");
        assert!(violation.contains("/label"), "got: {violation}");
    }

    #[test]
    fn accepts_valid_arguments() {
        let descriptor =
            ToolDescriptor::new("echo", "echoes arguments", sample_schema(), echo_handler)
                .expect("schema compiles");

        descriptor
            .validate_arguments(&json!({ "label": "ok" }))
            .expect("valid arguments");
    }

    #[test]
    fn names_preserve_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["one", "two", "three"] {
            registry
                .register(
                    ToolDescriptor::new(name, "tool", json!({"type": "object"}), echo_handler)
                        .expect("schema compiles"),
                )
                .expect("register");
        }

        assert_eq!(registry.names(), vec!["one", "two", "three"]);
    }
}
