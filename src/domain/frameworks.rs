//! Static threat-modeling framework content
//!
//! Inert data returned by the tool handlers. Builders are pure and
//! deterministic so identical requests produce identical responses.

use serde_json::{json, Value};

pub fn stride_framework() -> Value {
    json!({
        "methodology": "STRIDE",
        "categories": {
            "S": {
                "name": "Spoofing",
                "violates": "Authentication",
                "description": "Pretending to be something or someone other than yourself",
                "key_questions": [
                    "How are users, services, and devices authenticated?",
                    "Can credentials or session tokens be stolen or replayed?",
                    "Are there unauthenticated channels that accept identity claims?"
                ],
                "example_threats": [
                    "Credential stuffing against the login endpoint",
                    "Session token replay from an intercepted request",
                    "DNS spoofing redirecting clients to a rogue server"
                ]
            },
            "T": {
                "name": "Tampering",
                "violates": "Integrity",
                "description": "Modifying data in transit, at rest, or in memory without authorization",
                "key_questions": [
                    "Which data flows cross a trust boundary without integrity protection?",
                    "Can stored records be altered outside the application's write paths?",
                    "Are client-supplied values trusted in security decisions?"
                ],
                "example_threats": [
                    "SQL injection rewriting query semantics",
                    "Parameter tampering to change an order total",
                    "Unsigned configuration files replaced on disk"
                ]
            },
            "R": {
                "name": "Repudiation",
                "violates": "Non-repudiation",
                "description": "Claiming to not have performed an action, exploiting missing or weak evidence",
                "key_questions": [
                    "Which security-relevant actions are logged, and can logs be altered?",
                    "Do logs capture actor identity and a reliable timestamp?",
                    "Can a user deny a transaction the system cannot prove?"
                ],
                "example_threats": [
                    "Admin deletes records and the audit trail with them",
                    "Payment dispute with no server-side evidence of the order",
                    "Shared service accounts hiding who performed an action"
                ]
            },
            "I": {
                "name": "Information Disclosure",
                "violates": "Confidentiality",
                "description": "Exposing information to parties not authorized to see it",
                "key_questions": [
                    "Where does sensitive data travel or rest unencrypted?",
                    "Do error messages or APIs leak internal details?",
                    "Can one tenant or user read another's data?"
                ],
                "example_threats": [
                    "Verbose stack traces returned to clients",
                    "Insecure direct object references exposing other users' records",
                    "Backups stored in a world-readable bucket"
                ]
            },
            "D": {
                "name": "Denial of Service",
                "violates": "Availability",
                "description": "Degrading or denying service to legitimate users",
                "key_questions": [
                    "Which endpoints accept unbounded input sizes or rates?",
                    "What single components would take the system down with them?",
                    "Are expensive operations reachable without throttling?"
                ],
                "example_threats": [
                    "Oversized or deeply nested payloads exhausting parsers",
                    "Unthrottled password reset flooding the mail queue",
                    "Lock contention triggered by crafted concurrent requests"
                ]
            },
            "E": {
                "name": "Elevation of Privilege",
                "violates": "Authorization",
                "description": "Gaining capabilities beyond those granted",
                "key_questions": [
                    "Are authorization checks enforced on every path to a privileged action?",
                    "Can a low-privilege role reach admin functionality directly?",
                    "Do deserialization or template features allow code execution?"
                ],
                "example_threats": [
                    "Missing server-side check on an admin-only API",
                    "JWT role claim accepted without signature verification",
                    "Path traversal reaching files outside the web root"
                ]
            }
        },
        "extended_threat_domains": {
            "traditional_web": {
                "description": "Browser-facing applications with server-rendered or SPA frontends",
                "focus_areas": [
                    "Injection (SQL, command, template)",
                    "Cross-site scripting and CSRF",
                    "Session management and cookie hardening",
                    "Access control on every state-changing route"
                ]
            },
            "cloud_infrastructure": {
                "description": "Managed services, IAM, and infrastructure-as-code",
                "focus_areas": [
                    "Over-permissive IAM roles and service accounts",
                    "Publicly exposed storage buckets and snapshots",
                    "Metadata service abuse from compromised workloads",
                    "Drift between declared and deployed infrastructure"
                ]
            },
            "ai_ml_systems": {
                "description": "Systems embedding models, prompts, or training pipelines",
                "focus_areas": [
                    "Prompt injection and jailbreaking of model guardrails",
                    "Training data poisoning and model supply chain",
                    "Sensitive data leakage through model outputs",
                    "Over-reliance on model output in security decisions"
                ]
            },
            "iot_embedded": {
                "description": "Devices with constrained hardware and long update cycles",
                "focus_areas": [
                    "Hardcoded credentials and debug interfaces",
                    "Unsigned or unverified firmware updates",
                    "Physical access to storage and buses",
                    "Fleet-wide compromise through shared secrets"
                ]
            },
            "mobile_applications": {
                "description": "iOS/Android clients and their backend contracts",
                "focus_areas": [
                    "Secrets embedded in the shipped binary",
                    "Insecure local storage of tokens and PII",
                    "Certificate pinning gaps enabling interception",
                    "Trusting client-side checks the backend must repeat"
                ]
            },
            "api_microservices": {
                "description": "Service-to-service APIs and gateway topologies",
                "focus_areas": [
                    "Missing authentication between internal services",
                    "Broken object-level authorization on resource IDs",
                    "Mass assignment through permissive deserialization",
                    "Rate limiting and quota enforcement per consumer"
                ]
            }
        }
    })
}

pub fn stride_analysis_guidance() -> Value {
    json!({
        "approach": [
            "Decompose the application into components, data flows, and trust boundaries",
            "Apply each STRIDE category to every component and boundary crossing",
            "Record concrete, application-specific threats rather than generic ones",
            "Carry identified threats into mitigation, scoring, and reporting tools"
        ],
        "quality_bar": "Each threat should name the affected component, the attack vector, and the impact."
    })
}

pub fn mitigation_framework() -> Value {
    json!({
        "categories": {
            "Preventive": {
                "description": "Controls that stop the threat from being exercised",
                "examples": [
                    "Parameterized queries",
                    "Input validation at trust boundaries",
                    "Strong authentication and authorization checks"
                ]
            },
            "Detective": {
                "description": "Controls that surface an attack in progress or after the fact",
                "examples": [
                    "Structured audit logging with integrity protection",
                    "Anomaly detection on authentication flows",
                    "File and configuration integrity monitoring"
                ]
            },
            "Corrective": {
                "description": "Controls that limit damage and restore service after compromise",
                "examples": [
                    "Credential rotation runbooks",
                    "Tested backup and restore procedures",
                    "Incident response playbooks with owners"
                ]
            }
        },
        "difficulty_levels": {
            "Easy": "Configuration change or library adoption; hours to days",
            "Medium": "Code changes across a component; days to weeks",
            "Hard": "Architectural change or new infrastructure; weeks to months"
        },
        "prioritization": [
            "Address Critical and High severity threats first",
            "Prefer preventive controls, then detective, then corrective",
            "Pair every hard mitigation with an interim detective control"
        ]
    })
}

pub fn mitigation_analysis_guidance() -> Value {
    json!({
        "per_threat": [
            "Propose at least one preventive control per threat",
            "State the control type, difficulty, and residual risk",
            "Reference the specific component the control attaches to"
        ],
        "output_shape": "One mitigation object per threat with strategy, control_type, difficulty, and priority."
    })
}

pub fn dread_framework() -> Value {
    json!({
        "methodology": "DREAD",
        "scoring_criteria": {
            "Damage": {
                "question": "How bad is the impact if the attack succeeds?",
                "scale": "1-10, from nuisance to complete system or data compromise"
            },
            "Reproducibility": {
                "question": "How reliably can the attack be repeated?",
                "scale": "1-10, from works rarely under race conditions to works every time"
            },
            "Exploitability": {
                "question": "How much skill and effort does the attack require?",
                "scale": "1-10, from advanced persistent tooling to a browser and curiosity"
            },
            "Affected_Users": {
                "question": "What fraction of users does the attack impact?",
                "scale": "1-10, from a single user to the entire user base"
            },
            "Discoverability": {
                "question": "How likely is an attacker to find the weakness?",
                "scale": "1-10, from requires source access to visible from the public surface"
            }
        },
        "risk_levels": {
            "Critical": { "range": "40-50", "action": "Fix immediately; consider taking the feature offline" },
            "High": { "range": "25-39", "action": "Fix in the current release cycle" },
            "Medium": { "range": "11-24", "action": "Schedule within the quarter" },
            "Low": { "range": "1-10", "action": "Accept or fix opportunistically" }
        },
        "total": "Sum of the five criteria, 5-50"
    })
}

pub fn dread_calibration_guidance() -> Value {
    json!({
        "damage": "Anchor 10 to irreversible loss (data destruction, safety impact); anchor 1 to cosmetic issues.",
        "reproducibility": "Score 10 only when the attack needs no timing, race, or environmental luck.",
        "exploitability": "Public exploit code or a pure-browser attack scores 8+; custom research scores 3 or less.",
        "affected_users": "Score by reachable accounts, not active ones; shared infrastructure multiplies reach.",
        "discoverability": "Assume attackers enumerate public surfaces; hidden-but-unauthenticated scores high."
    })
}

pub fn dread_scoring_examples() -> Value {
    json!([
        {
            "threat": "SQL injection in a public search endpoint",
            "dread_breakdown": {
                "damage": 9,
                "reproducibility": 9,
                "exploitability": 8,
                "affected_users": 9,
                "discoverability": 8,
                "total": 43,
                "risk_level": "Critical"
            },
            "rationale": "Full database read/write, deterministic, reachable without authentication."
        },
        {
            "threat": "Verbose error pages exposing framework versions",
            "dread_breakdown": {
                "damage": 3,
                "reproducibility": 10,
                "exploitability": 9,
                "affected_users": 2,
                "discoverability": 9,
                "total": 33,
                "risk_level": "High"
            },
            "rationale": "Trivial to trigger but the direct impact is reconnaissance, not compromise."
        },
        {
            "threat": "CSRF on a low-impact preference endpoint",
            "dread_breakdown": {
                "damage": 2,
                "reproducibility": 6,
                "exploitability": 5,
                "affected_users": 3,
                "discoverability": 4,
                "total": 20,
                "risk_level": "Medium"
            },
            "rationale": "Requires luring a victim and only changes non-security preferences."
        }
    ])
}

pub fn dread_analysis_guidance() -> Value {
    json!({
        "process": [
            "Score each threat against all five criteria using the calibration anchors",
            "Sum to a total and map to a risk level",
            "Sort descending by total to produce the remediation order"
        ],
        "consistency": "Score relative to the same deployment context for every threat in the model."
    })
}

pub fn attack_tree_framework() -> Value {
    json!({
        "structure": {
            "root_goal": "The attacker's objective, phrased as an outcome (e.g. 'Read another tenant's data')",
            "sub_goals": "Intermediate conditions that satisfy the root, combined with AND/OR semantics",
            "attack_methods": "Leaf techniques with feasibility notes and required preconditions"
        },
        "construction_steps": [
            "Pick one root goal per tree; do not merge unrelated objectives",
            "Expand each node by asking how an attacker could achieve it",
            "Stop expanding at the requested maximum depth or at well-understood leaves",
            "Mark each leaf with difficulty and whether existing controls block it"
        ],
        "evaluation": [
            "A path of all-unblocked leaves is an open attack path",
            "Prioritize mitigations that cut the cheapest open paths first"
        ]
    })
}

pub fn attack_tree_output_formats() -> Value {
    json!({
        "text": "Indented outline, one node per line, AND/OR markers on branches",
        "mermaid": "Mermaid `graph TD` source suitable for embedding in markdown",
        "json": "Nested {goal, operator, children[]} objects for programmatic use",
        "both": "Text outline plus mermaid source for the same tree"
    })
}

pub fn security_testing_framework() -> Value {
    json!({
        "test_types": {
            "unit": "Exercise a single control in isolation (validator rejects oversized input)",
            "integration": "Exercise a control in the deployed request path (WAF plus app validation)",
            "penetration": "Adversarial testing attempting to bypass controls end to end",
            "compliance": "Verify controls required by policy or regulation are present and configured"
        },
        "test_formats": {
            "gherkin": "Given/When/Then scenarios executable by BDD harnesses",
            "procedural": "Numbered manual steps with expected results",
            "checklist": "Binary pass/fail items suitable for release gates"
        },
        "coverage_rule": "Every mitigated threat gets at least one test that fails if the mitigation regresses."
    })
}

pub fn security_test_format_examples() -> Value {
    json!({
        "gherkin": concat!(
            "Feature: Login rate limiting\n",
            "  Scenario: Burst of failed logins is throttled\n",
            "    Given a user account \"victim@example.com\"\n",
            "    When 20 login attempts with wrong passwords arrive within one minute\n",
            "    Then attempts beyond the 10th receive HTTP 429\n",
            "    And an alert is recorded for the account"
        ),
        "checklist": concat!(
            "- [ ] All state-changing endpoints require a valid CSRF token\n",
            "- [ ] Session cookies set Secure, HttpOnly, SameSite\n",
            "- [ ] Error responses contain no stack traces or internal paths"
        ),
        "markdown": concat!(
            "### Test: Object-level authorization on /orders/{id}\n",
            "1. Authenticate as user A and create an order.\n",
            "2. Authenticate as user B and request user A's order ID.\n",
            "**Expected:** HTTP 404 or 403; response body contains no order data."
        )
    })
}

pub fn security_testing_guidance() -> Value {
    json!({
        "derivation": [
            "Derive each test from a specific threat and its mitigation",
            "Name the threat ID in the test description for traceability",
            "Prefer the narrowest test type that can detect the regression"
        ]
    })
}

pub fn coverage_framework() -> Value {
    json!({
        "stride_categories": {
            "S": "Spoofing",
            "T": "Tampering",
            "R": "Repudiation",
            "I": "Information Disclosure",
            "D": "Denial of Service",
            "E": "Elevation of Privilege"
        },
        "validation_criteria": {
            "completeness": "Every STRIDE category considered for every component and trust boundary",
            "specificity": "Threats name concrete components and vectors, not generic categories",
            "actionability": "Each threat is phrased so a mitigation can be designed against it",
            "risk_alignment": "Severity assignments are consistent with the application's data and exposure"
        },
        "common_gaps": {
            "trust_boundaries": "Boundaries between components, tenants, or networks left unmodeled",
            "data_flows": "Flows that bypass the primary API path (batch jobs, webhooks, imports)",
            "privileged_operations": "Admin tooling, migrations, and break-glass paths outside the main model"
        },
        "review_questions": [
            "Which categories have zero threats, and is that justified for this application?",
            "Do internet-facing components have spoofing and DoS coverage?",
            "Are repudiation threats considered for every financially relevant action?"
        ]
    })
}

pub fn coverage_analysis_guidance() -> Value {
    json!({
        "process": [
            "Bucket the submitted threats by STRIDE category",
            "Compare category coverage against the application context",
            "Flag empty categories and unmodeled common gaps as enhancement candidates"
        ]
    })
}

pub fn repository_analysis_stages() -> Value {
    json!({
        "stages": {
            "initial": {
                "goal": "Quick reconnaissance to understand what the repository is and its exposure",
                "produces": "Application type, primary language, entry points, and data sensitivity estimate"
            },
            "deep_dive": {
                "goal": "Detailed security analysis of boundaries, authentication, and data handling",
                "produces": "Trust boundary inventory and candidate threat inputs per component"
            },
            "validation": {
                "goal": "Readiness check that extracted inputs are complete enough for threat modeling",
                "produces": "Go/no-go checklist result plus the assembled threat modeling input"
            }
        }
    })
}

pub fn initial_reconnaissance() -> Value {
    json!({
        "files_to_examine_first": [
            "README and top-level docs for stated purpose and deployment model",
            "Dependency manifests (Cargo.toml, package.json, requirements.txt, go.mod)",
            "CI/CD and deployment configuration (Dockerfile, compose, workflows)",
            "Configuration samples and environment variable references",
            "Route or endpoint registrations for the network surface"
        ],
        "signals_to_collect": [
            "Primary language and framework",
            "Whether the service is internet-facing",
            "Authentication mechanisms referenced in code or config",
            "Categories of data stored or processed"
        ]
    })
}

pub fn deep_dive_analysis() -> Value {
    json!({
        "trust_boundaries": [
            "Client to server entry points and their validation",
            "Service-to-service calls and how callers are authenticated",
            "Application to data store access paths and credentials",
            "Third-party integrations and webhook receivers"
        ],
        "authentication_surfaces": [
            "Login, token issuance, and session management code",
            "Password storage and credential handling",
            "Authorization checks guarding privileged operations"
        ],
        "data_handling": [
            "Where sensitive fields are read, written, logged, or exported",
            "Encryption in transit and at rest",
            "Retention and deletion paths"
        ],
        "dangerous_sinks": [
            "Raw SQL construction, shell execution, deserialization of untrusted input",
            "File system paths built from request data",
            "Template rendering with user-controlled content"
        ]
    })
}

pub fn validation_checklist() -> Value {
    json!({
        "items": [
            "Application description covers purpose, users, and deployment environment",
            "Application type and internet exposure are determined",
            "Authentication methods are enumerated",
            "Sensitive data types are enumerated",
            "Major components and trust boundaries are listed",
            "Known dangerous sinks have been searched for"
        ],
        "ready_when": "Every item is satisfied or explicitly marked not applicable"
    })
}

pub fn repository_output_template() -> Value {
    json!({
        "threat_modeling_input": {
            "app_description": "<one-paragraph summary of purpose, users, and architecture>",
            "app_type": "<Web Application | API | CLI | Service | Library>",
            "authentication_methods": ["<method>"],
            "internet_facing": "<true|false>",
            "sensitive_data_types": ["<data category>"]
        },
        "usage": "Pass threat_modeling_input as the arguments to get_stride_threat_framework"
    })
}

pub fn github_mcp_integration() -> Value {
    json!({
        "initial_stage_examples": [
            "search_repositories to locate the target and its forks",
            "get_file_contents on README and dependency manifests",
            "list_commits to gauge activity and maintenance"
        ],
        "deep_dive_examples": [
            "search_code for authentication middleware and route registrations",
            "search_code for raw SQL, exec calls, and deserialization entry points",
            "get_file_contents on configuration and deployment manifests"
        ],
        "note": "Any repository-browsing MCP server with equivalent read operations works the same way."
    })
}

pub fn repository_analysis_guidance() -> Value {
    json!({
        "flow": [
            "Run the initial stage to classify the repository",
            "Run deep_dive on the components the initial stage surfaced",
            "Run validation before handing inputs to the threat modeling tools"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_framework_has_all_six_categories() {
        let framework = stride_framework();
        let categories = framework["categories"].as_object().expect("categories");

        for key in ["S", "T", "R", "I", "D", "E"] {
            assert!(categories.contains_key(key), "missing category {key}");
        }
    }

    #[test]
    fn stride_framework_has_all_extended_domains() {
        let framework = stride_framework();
        let domains = framework["extended_threat_domains"]
            .as_object()
            .expect("domains");

        for key in [
            "traditional_web",
            "cloud_infrastructure",
            "ai_ml_systems",
            "iot_embedded",
            "mobile_applications",
            "api_microservices",
        ] {
            assert!(domains.contains_key(key), "missing domain {key}");
        }
    }

    #[test]
    fn mitigation_framework_covers_control_types_and_difficulty() {
        let framework = mitigation_framework();

        for key in ["Preventive", "Detective", "Corrective"] {
            assert!(framework["categories"].get(key).is_some(), "missing {key}");
        }
        for key in ["Easy", "Medium", "Hard"] {
            assert!(
                framework["difficulty_levels"].get(key).is_some(),
                "missing {key}"
            );
        }
    }

    #[test]
    fn dread_framework_covers_criteria_and_levels() {
        let framework = dread_framework();

        for key in [
            "Damage",
            "Reproducibility",
            "Exploitability",
            "Affected_Users",
            "Discoverability",
        ] {
            assert!(
                framework["scoring_criteria"].get(key).is_some(),
                "missing {key}"
            );
        }
        for key in ["Critical", "High", "Medium", "Low"] {
            assert!(framework["risk_levels"].get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn scoring_examples_have_breakdowns() {
        let examples = dread_scoring_examples();
        let examples = examples.as_array().expect("examples array");

        assert!(!examples.is_empty());
        for example in examples {
            assert!(example.get("threat").is_some());
            let breakdown = example["dread_breakdown"].as_object().expect("breakdown");
            let total = breakdown["total"].as_i64().expect("total");
            let sum: i64 = ["damage", "reproducibility", "exploitability", "affected_users", "discoverability"]
                .iter()
                .map(|key| breakdown[*key].as_i64().expect("criterion score"))
                .sum();
            assert_eq!(total, sum, "total must equal criterion sum");
        }
    }

    #[test]
    fn coverage_framework_names_expected_gaps() {
        let framework = coverage_framework();

        for key in ["trust_boundaries", "data_flows", "privileged_operations"] {
            assert!(framework["common_gaps"].get(key).is_some(), "missing {key}");
        }
        for key in ["completeness", "specificity", "actionability", "risk_alignment"] {
            assert!(
                framework["validation_criteria"].get(key).is_some(),
                "missing {key}"
            );
        }
    }

    #[test]
    fn repository_stages_are_complete() {
        let stages = repository_analysis_stages();

        for key in ["initial", "deep_dive", "validation"] {
            assert!(stages["stages"].get(key).is_some(), "missing stage {key}");
        }
        assert!(initial_reconnaissance()
            .get("files_to_examine_first")
            .is_some());
        assert!(deep_dive_analysis().get("trust_boundaries").is_some());
        assert!(repository_output_template()
            .get("threat_modeling_input")
            .is_some());
    }
}
