//! Markdown threat-report rendering

use serde_json::Value;

const STRIDE_SECTIONS: [(&str, &str); 6] = [
    ("S", "Spoofing"),
    ("T", "Tampering"),
    ("R", "Repudiation"),
    ("I", "Information Disclosure"),
    ("D", "Denial of Service"),
    ("E", "Elevation of Privilege"),
];

pub struct ReportInput<'a> {
    pub threat_model: &'a [Value],
    pub mitigations: &'a [Value],
    pub dread_scores: &'a [Value],
    pub attack_trees: &'a [Value],
    pub include_sections: &'a [String],
}

pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut report = String::from("# STRIDE Threat Model Report\n");

    if input.has_section("executive_summary") {
        render_executive_summary(&mut report, input);
        render_application_overview(&mut report, input);
    }
    if input.has_section("threats") {
        render_threat_analysis(&mut report, input);
    }
    if input.has_section("risk_scores") {
        render_risk_assessment(&mut report, input);
    }
    if input.has_section("mitigations") {
        render_mitigations(&mut report, input);
    }
    if input.has_section("attack_trees") {
        render_attack_trees(&mut report, input);
    }

    report
}

impl ReportInput<'_> {
    fn has_section(&self, section: &str) -> bool {
        self.include_sections.iter().any(|name| name == section)
    }
}

fn render_executive_summary(report: &mut String, input: &ReportInput<'_>) {
    report.push_str("\n## Executive Summary\n\n");
    report.push_str(&format!(
        "**Total Threats Identified:** {}\n",
        input.threat_model.len()
    ));

    let mut severities: Vec<(&str, usize)> = Vec::new();
    for severity in ["Critical", "High", "Medium", "Low"] {
        let count = input
            .threat_model
            .iter()
            .filter(|threat| {
                threat
                    .get("severity")
                    .and_then(Value::as_str)
                    .is_some_and(|value| value.eq_ignore_ascii_case(severity))
            })
            .count();
        if count > 0 {
            severities.push((severity, count));
        }
    }
    for (severity, count) in severities {
        report.push_str(&format!("- {severity}: {count}\n"));
    }

    if input.threat_model.is_empty() {
        report.push_str(
            "\nNo threats were supplied; sections below describe the expected analysis shape.\n",
        );
    }
}

fn render_application_overview(report: &mut String, input: &ReportInput<'_>) {
    report.push_str("\n## Application Overview\n\n");

    let mut components: Vec<&str> = input
        .threat_model
        .iter()
        .filter_map(|threat| threat.get("affected_component").and_then(Value::as_str))
        .collect();
    components.sort_unstable();
    components.dedup();

    if components.is_empty() {
        report.push_str("Components in scope were not itemized in the submitted threat model.\n");
    } else {
        report.push_str("Components referenced by the submitted threats:\n\n");
        for component in components {
            report.push_str(&format!("- {component}\n"));
        }
    }
}

fn render_threat_analysis(report: &mut String, input: &ReportInput<'_>) {
    report.push_str("\n## Threat Analysis\n");

    for (code, label) in STRIDE_SECTIONS {
        report.push_str(&format!("\n### {label} Threats\n\n"));

        let mut rendered_any = false;
        for threat in input.threat_model {
            if threat_category(threat) == Some(code) {
                render_threat(report, threat);
                rendered_any = true;
            }
        }
        if !rendered_any {
            report.push_str("_No threats identified in this category._\n");
        }
    }

    let uncategorized: Vec<&Value> = input
        .threat_model
        .iter()
        .filter(|threat| threat_category(threat).is_none())
        .collect();
    if !uncategorized.is_empty() {
        report.push_str("\n### Uncategorized Threats\n\n");
        for threat in uncategorized {
            render_threat(report, threat);
        }
    }
}

fn render_threat(report: &mut String, threat: &Value) {
    let name = threat
        .get("threat_name")
        .or_else(|| threat.get("name"))
        .or_else(|| threat.get("threat_id"))
        .or_else(|| threat.get("id"))
        .and_then(Value::as_str)
        .unwrap_or("Unnamed threat");
    report.push_str(&format!("- **{name}**"));

    if let Some(severity) = threat.get("severity").and_then(Value::as_str) {
        report.push_str(&format!(" ({severity})"));
    }
    if let Some(description) = threat.get("description").and_then(Value::as_str) {
        report.push_str(&format!(": {description}"));
    }
    if let Some(component) = threat.get("affected_component").and_then(Value::as_str) {
        report.push_str(&format!(" [{component}]"));
    }
    report.push('\n');
}

/// Normalizes `stride_category` / `category` to a single STRIDE letter.
fn threat_category(threat: &Value) -> Option<&'static str> {
    let raw = threat
        .get("stride_category")
        .or_else(|| threat.get("category"))
        .and_then(Value::as_str)?;

    let trimmed = raw.trim();
    let initial = trimmed.chars().next()?.to_ascii_uppercase();
    STRIDE_SECTIONS
        .iter()
        .find(|(code, label)| {
            if trimmed.len() == 1 {
                code.starts_with(initial)
            } else {
                label.eq_ignore_ascii_case(trimmed)
            }
        })
        .map(|(code, _)| *code)
}

fn render_risk_assessment(report: &mut String, input: &ReportInput<'_>) {
    report.push_str("\n## Risk Assessment\n\n");

    if input.dread_scores.is_empty() {
        report.push_str(
            "No DREAD scores were supplied. Use calculate_threat_risk_scores to produce them.\n",
        );
        return;
    }

    report.push_str("| Threat | Total | Risk Level |\n|---|---|---|\n");
    for score in input.dread_scores {
        let threat_id = score
            .get("threat_id")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let breakdown = score.get("dread_score").unwrap_or(&Value::Null);
        let total = breakdown
            .get("total")
            .and_then(Value::as_i64)
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string());
        let level = breakdown
            .get("risk_level")
            .and_then(Value::as_str)
            .unwrap_or("-");
        report.push_str(&format!("| {threat_id} | {total} | {level} |\n"));
    }
}

fn render_mitigations(report: &mut String, input: &ReportInput<'_>) {
    report.push_str("\n## Recommended Mitigations\n\n");

    if input.mitigations.is_empty() {
        report.push_str(
            "No mitigations were supplied. Use generate_threat_mitigations to produce them.\n",
        );
        return;
    }

    for mitigation in input.mitigations {
        let strategy = mitigation
            .get("strategy")
            .and_then(Value::as_str)
            .unwrap_or("Unspecified mitigation");
        report.push_str(&format!("- {strategy}"));

        if let Some(threat_id) = mitigation.get("threat_id").and_then(Value::as_str) {
            report.push_str(&format!(" (addresses {threat_id}"));
            if let Some(priority) = mitigation.get("priority").and_then(Value::as_str) {
                report.push_str(&format!(", priority {priority}"));
            }
            report.push(')');
        }
        report.push('\n');
    }
}

fn render_attack_trees(report: &mut String, input: &ReportInput<'_>) {
    report.push_str("\n## Attack Tree Summary\n\n");

    if input.attack_trees.is_empty() {
        report.push_str(
            "No attack trees were supplied. Use create_threat_attack_trees to produce them.\n",
        );
        return;
    }

    for tree in input.attack_trees {
        let goal = tree
            .get("root_goal")
            .or_else(|| tree.get("goal"))
            .and_then(Value::as_str)
            .unwrap_or("Unnamed attack goal");
        report.push_str(&format!("- Root goal: {goal}\n"));
    }
}
