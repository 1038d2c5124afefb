//! Threat-modeling tools exposed via the JSON-RPC surface
//!
//! Each tool is a pure handler plus a declared input schema; the registry is
//! assembled here once at startup.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::domain::{frameworks, report};
use crate::registry::{RegistryError, ToolDescriptor, ToolError, ToolRegistry};

/// Builds the complete, immutable tool registry.
pub fn build_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();

    registry.register(ToolDescriptor::new(
        "get_stride_threat_framework",
        "Get comprehensive STRIDE threat modeling framework and guidance for threat analysis",
        stride_framework_schema(),
        get_stride_threat_framework,
    )?)?;
    registry.register(ToolDescriptor::new(
        "generate_threat_mitigations",
        "Generate actionable security mitigations for identified threats",
        mitigations_schema(),
        generate_threat_mitigations,
    )?)?;
    registry.register(ToolDescriptor::new(
        "create_threat_attack_trees",
        "Generate application-wide attack tree showing common attack vectors",
        attack_trees_schema(),
        create_threat_attack_trees,
    )?)?;
    registry.register(ToolDescriptor::new(
        "calculate_threat_risk_scores",
        "Calculate DREAD risk scores to prioritize threats by severity",
        risk_scores_schema(),
        calculate_threat_risk_scores,
    )?)?;
    registry.register(ToolDescriptor::new(
        "generate_security_tests",
        "Generate security test cases to validate threat mitigations",
        security_tests_schema(),
        generate_security_tests,
    )?)?;
    registry.register(ToolDescriptor::new(
        "generate_threat_report",
        "Format complete threat analysis as professional markdown report",
        threat_report_schema(),
        generate_threat_report,
    )?)?;
    registry.register(ToolDescriptor::new(
        "validate_threat_coverage",
        "Validate STRIDE coverage completeness and suggest threat model enhancements",
        coverage_schema(),
        validate_threat_coverage,
    )?)?;
    registry.register(ToolDescriptor::new(
        "get_repository_analysis_guide",
        "Get structured framework for extracting threat modeling inputs from repository \
         analysis using GitHub MCP or similar tools",
        repository_guide_schema(),
        get_repository_analysis_guide,
    )?)?;

    Ok(registry)
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

// ---------------------------------------------------------------------------
// get_stride_threat_framework
// ---------------------------------------------------------------------------

fn stride_framework_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "app_description": {
                "type": "string",
                "description": "Detailed description of the application architecture and functionality"
            },
            "app_type": {
                "type": "string",
                "description": "Type of application",
                "default": "Web Application"
            },
            "authentication_methods": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of authentication methods used",
                "default": ["Username/Password"]
            },
            "internet_facing": {
                "type": "boolean",
                "description": "Whether the application is accessible from the internet",
                "default": true
            },
            "sensitive_data_types": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Types of sensitive data handled",
                "default": ["User Data"]
            }
        },
        "required": ["app_description"]
    })
}

#[derive(Debug, Deserialize)]
struct FrameworkParams {
    app_description: String,
    #[serde(default = "default_app_type")]
    app_type: String,
    #[serde(default = "default_authentication_methods")]
    authentication_methods: Vec<String>,
    #[serde(default = "default_internet_facing")]
    internet_facing: bool,
    #[serde(default = "default_sensitive_data_types")]
    sensitive_data_types: Vec<String>,
}

fn default_app_type() -> String {
    "Web Application".to_string()
}

fn default_authentication_methods() -> Vec<String> {
    vec!["Username/Password".to_string()]
}

fn default_internet_facing() -> bool {
    true
}

fn default_sensitive_data_types() -> Vec<String> {
    vec!["User Data".to_string()]
}

pub fn get_stride_threat_framework(arguments: Value) -> Result<Value, ToolError> {
    let params: FrameworkParams = parse_arguments(arguments)?;

    Ok(json!({
        "stride_framework": frameworks::stride_framework(),
        "application_context": {
            "app_description": params.app_description,
            "app_type": params.app_type,
            "authentication_methods": params.authentication_methods,
            "internet_facing": params.internet_facing,
            "sensitive_data_types": params.sensitive_data_types,
        },
        "analysis_guidance": frameworks::stride_analysis_guidance(),
        "next_steps": [
            "Enumerate threats per STRIDE category for each component",
            "Call generate_threat_mitigations with the identified threats",
            "Call calculate_threat_risk_scores to prioritize remediation",
            "Call generate_threat_report to assemble the final document"
        ],
    }))
}

// ---------------------------------------------------------------------------
// generate_threat_mitigations
// ---------------------------------------------------------------------------

fn mitigations_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "threats": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Array of threat objects"
            },
            "priority_filter": {
                "type": "string",
                "description": "Filter by priority",
                "default": "all"
            }
        },
        "required": ["threats"]
    })
}

#[derive(Debug, Deserialize)]
struct MitigationParams {
    threats: Vec<Value>,
    #[serde(default = "default_priority_filter")]
    priority_filter: String,
}

fn default_priority_filter() -> String {
    "all".to_string()
}

pub fn generate_threat_mitigations(arguments: Value) -> Result<Value, ToolError> {
    let params: MitigationParams = parse_arguments(arguments)?;

    Ok(json!({
        "mitigation_framework": frameworks::mitigation_framework(),
        "threat_context": params.threats,
        "priority_filter": params.priority_filter,
        "analysis_guidance": frameworks::mitigation_analysis_guidance(),
    }))
}

// ---------------------------------------------------------------------------
// create_threat_attack_trees
// ---------------------------------------------------------------------------

fn attack_trees_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "threats": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Array of threat objects (used for context)"
            },
            "max_depth": {
                "type": "integer",
                "description": "Maximum tree depth",
                "default": 3
            },
            "output_format": {
                "type": "string",
                "description": "Output format",
                "default": "both"
            }
        },
        "required": ["threats"]
    })
}

#[derive(Debug, Deserialize)]
struct AttackTreeParams {
    threats: Vec<Value>,
    #[serde(default = "default_max_depth")]
    max_depth: i64,
    #[serde(default = "default_output_format")]
    output_format: String,
}

fn default_max_depth() -> i64 {
    3
}

fn default_output_format() -> String {
    "both".to_string()
}

pub fn create_threat_attack_trees(arguments: Value) -> Result<Value, ToolError> {
    let params: AttackTreeParams = parse_arguments(arguments)?;

    Ok(json!({
        "attack_tree_framework": frameworks::attack_tree_framework(),
        "output_formats": frameworks::attack_tree_output_formats(),
        "threat_context": params.threats,
        "max_depth": params.max_depth,
        "output_format": params.output_format,
    }))
}

// ---------------------------------------------------------------------------
// calculate_threat_risk_scores
// ---------------------------------------------------------------------------

fn risk_scores_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "threats": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Array of threat objects"
            },
            "scoring_guidance": {
                "type": "object",
                "additionalProperties": true,
                "description": "Optional guidance for scoring adjustments"
            }
        },
        "required": ["threats"]
    })
}

#[derive(Debug, Deserialize)]
struct RiskScoreParams {
    threats: Vec<Value>,
    #[serde(default)]
    scoring_guidance: Option<Value>,
}

pub fn calculate_threat_risk_scores(arguments: Value) -> Result<Value, ToolError> {
    let params: RiskScoreParams = parse_arguments(arguments)?;

    Ok(json!({
        "dread_framework": frameworks::dread_framework(),
        "threats": params.threats,
        "calibration_guidance": frameworks::dread_calibration_guidance(),
        "scoring_examples": frameworks::dread_scoring_examples(),
        "scoring_guidance": params.scoring_guidance.unwrap_or_else(|| json!({})),
        "analysis_guidance": frameworks::dread_analysis_guidance(),
    }))
}

// ---------------------------------------------------------------------------
// generate_security_tests
// ---------------------------------------------------------------------------

fn security_tests_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "threats": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Array of threat objects"
            },
            "test_type": {
                "type": "string",
                "description": "Type of tests",
                "default": "mixed"
            },
            "format_type": {
                "type": "string",
                "description": "Output format",
                "default": "gherkin"
            }
        },
        "required": ["threats"]
    })
}

#[derive(Debug, Deserialize)]
struct SecurityTestParams {
    threats: Vec<Value>,
    #[serde(default = "default_test_type")]
    test_type: String,
    #[serde(default = "default_format_type")]
    format_type: String,
}

fn default_test_type() -> String {
    "mixed".to_string()
}

fn default_format_type() -> String {
    "gherkin".to_string()
}

pub fn generate_security_tests(arguments: Value) -> Result<Value, ToolError> {
    let params: SecurityTestParams = parse_arguments(arguments)?;

    Ok(json!({
        "security_testing_framework": frameworks::security_testing_framework(),
        "format_examples": frameworks::security_test_format_examples(),
        "threat_context": params.threats,
        "test_type": params.test_type,
        "format_type": params.format_type,
        "analysis_guidance": frameworks::security_testing_guidance(),
    }))
}

// ---------------------------------------------------------------------------
// generate_threat_report
// ---------------------------------------------------------------------------

fn threat_report_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "threat_model": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Array of threat objects"
            },
            "mitigations": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Optional array of mitigation strategies"
            },
            "dread_scores": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Optional array of DREAD scores"
            },
            "attack_trees": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Optional array of attack trees"
            },
            "include_sections": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Sections to include in report",
                "default": ["executive_summary", "threats", "mitigations", "risk_scores"]
            }
        },
        "required": ["threat_model"]
    })
}

#[derive(Debug, Deserialize)]
struct ThreatReportParams {
    threat_model: Vec<Value>,
    #[serde(default)]
    mitigations: Vec<Value>,
    #[serde(default)]
    dread_scores: Vec<Value>,
    #[serde(default)]
    attack_trees: Vec<Value>,
    #[serde(default = "default_report_sections")]
    include_sections: Vec<String>,
}

fn default_report_sections() -> Vec<String> {
    ["executive_summary", "threats", "mitigations", "risk_scores"]
        .iter()
        .map(|section| section.to_string())
        .collect()
}

/// The one tool whose result is a markdown string rather than a JSON mapping.
pub fn generate_threat_report(arguments: Value) -> Result<Value, ToolError> {
    let params: ThreatReportParams = parse_arguments(arguments)?;

    let rendered = report::render_report(&report::ReportInput {
        threat_model: &params.threat_model,
        mitigations: &params.mitigations,
        dread_scores: &params.dread_scores,
        attack_trees: &params.attack_trees,
        include_sections: &params.include_sections,
    });

    Ok(Value::String(rendered))
}

// ---------------------------------------------------------------------------
// validate_threat_coverage
// ---------------------------------------------------------------------------

fn coverage_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "threat_model": {
                "type": "array",
                "items": { "type": "object", "additionalProperties": true },
                "description": "Array of threat objects to validate"
            },
            "app_context": {
                "type": "object",
                "additionalProperties": true,
                "description": "Application context information"
            }
        },
        "required": ["threat_model", "app_context"]
    })
}

#[derive(Debug, Deserialize)]
struct CoverageParams {
    threat_model: Vec<Value>,
    app_context: Map<String, Value>,
}

pub fn validate_threat_coverage(arguments: Value) -> Result<Value, ToolError> {
    let params: CoverageParams = parse_arguments(arguments)?;

    Ok(json!({
        "coverage_framework": frameworks::coverage_framework(),
        "threat_model": params.threat_model,
        "app_context": params.app_context,
        "analysis_guidance": frameworks::coverage_analysis_guidance(),
    }))
}

// ---------------------------------------------------------------------------
// get_repository_analysis_guide
// ---------------------------------------------------------------------------

fn repository_guide_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "analysis_stage": {
                "type": "string",
                "description": "Analysis stage: 'initial' (quick scan), 'deep_dive' (detailed security analysis), or 'validation' (readiness check)",
                "enum": ["initial", "deep_dive", "validation"],
                "default": "initial"
            },
            "repository_context": {
                "type": "object",
                "description": "Optional context about the repository",
                "properties": {
                    "primary_language": {
                        "type": "string",
                        "description": "Primary programming language detected"
                    },
                    "framework_detected": {
                        "type": "string",
                        "description": "Primary framework or platform detected"
                    },
                    "repository_type": {
                        "type": "string",
                        "description": "Type of repository",
                        "enum": ["application", "library", "infrastructure", "unknown"]
                    }
                }
            }
        },
        "required": []
    })
}

#[derive(Debug, Deserialize)]
struct RepositoryGuideParams {
    #[serde(default = "default_analysis_stage")]
    analysis_stage: String,
    #[serde(default)]
    repository_context: Map<String, Value>,
}

fn default_analysis_stage() -> String {
    "initial".to_string()
}

pub fn get_repository_analysis_guide(arguments: Value) -> Result<Value, ToolError> {
    let params: RepositoryGuideParams = parse_arguments(arguments)?;

    let mut result = json!({
        "analysis_framework": frameworks::repository_analysis_stages(),
        "current_stage": params.analysis_stage,
        "output_template": frameworks::repository_output_template(),
        "github_mcp_integration": frameworks::github_mcp_integration(),
        "repository_context": params.repository_context,
        "analysis_guidance": frameworks::repository_analysis_guidance(),
    });

    let stage_block = match params.analysis_stage.as_str() {
        "initial" => ("initial_reconnaissance", frameworks::initial_reconnaissance()),
        "deep_dive" => ("deep_dive_analysis", frameworks::deep_dive_analysis()),
        "validation" => ("validation_checklist", frameworks::validation_checklist()),
        other => {
            return Err(ToolError::InvalidArguments(format!(
                "analysis_stage must be one of initial, deep_dive, validation; got {other}"
            )))
        }
    };

    let entries = result
        .as_object_mut()
        .expect("repository guide result is an object");
    entries.insert(stage_block.0.to_string(), stage_block.1);

    Ok(result)
}
