//! Report generation for lab checks and topology validation.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use chrono::Utc;
use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::lab::{check_completion, Lab, LabProgress};
use crate::rules::ValidationReport;
use crate::topology::TopologyView;

/// Lab progress together with the lab it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct LabReport {
    pub lab_id: String,
    pub title: String,
    pub generated_at: String,
    pub progress: LabProgress,
}

impl LabReport {
    /// Evaluate `lab` against the topology and build a report
    pub fn evaluate<V: TopologyView + ?Sized>(lab: &Lab, view: &V, message_count: u64) -> Self {
        Self {
            lab_id: lab.id.clone(),
            title: lab.title.clone(),
            generated_at: Utc::now().to_rfc3339(),
            progress: check_completion(&lab.requirement, view, message_count),
        }
    }
}

/// Write any report as pretty-printed JSON
pub fn write_json_report<T: Serialize>(report: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Human-readable rendering of lab reports
pub fn render_lab_reports(reports: &[LabReport]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(60));
    lines.push("                     LAB PROGRESS".to_string());
    lines.push("=".repeat(60));

    if reports.is_empty() {
        lines.push("No labs defined.".to_string());
    }

    for report in reports {
        let p = &report.progress;
        lines.push(String::new());
        lines.push(format!(
            "[{}] {} ({})",
            if p.satisfied { "x" } else { " " },
            report.title,
            report.lab_id
        ));
        lines.push(format!(
            "  Progress: {}/{} ({:.0}%)",
            p.fulfilled,
            p.total,
            p.fraction() * 100.0
        ));
        if p.nodes.required > 0 {
            lines.push(format!("  Nodes: {}/{}", p.nodes.matched, p.nodes.required));
        }
        if p.connections.required > 0 {
            lines.push(format!(
                "  Connections: {}/{}",
                p.connections.matched, p.connections.required
            ));
        }
        if let Some(m) = p.messages {
            lines.push(format!("  Messages: {}/{}", m.sent.min(m.required), m.required));
        }
        if let Some(e) = &p.error {
            lines.push(format!("  Error: {}", e));
        }
    }

    lines.join("\n")
}

/// Human-readable rendering of a validation report
pub fn render_validation_report(report: &ValidationReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Topology: {}", report.topology_name));
    if report.is_valid {
        lines.push("Status: VALID".to_string());
    } else {
        lines.push(format!("Status: INVALID ({} issue(s))", report.issues.len()));
        for issue in &report.issues {
            lines.push(format!("  - {}", issue));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lab::Requirement;
    use crate::rules::validate_static_topology;
    use crate::topology::{Node, NodeType, Topology};

    fn lab(requirement: Requirement) -> Lab {
        Lab {
            id: "hosts".to_string(),
            title: "Place two hosts".to_string(),
            description: None,
            requirement,
        }
    }

    #[test]
    fn test_lab_report_rendering() {
        let mut topology = Topology::new();
        topology.add_node(Node::new("h1", NodeType::ClassicalHost)).unwrap();

        let requirement = Requirement {
            nodes: vec![NodeType::ClassicalHost, NodeType::ClassicalHost],
            messages: Some(4),
            ..Requirement::default()
        };
        let report = LabReport::evaluate(&lab(requirement), &topology, 9);
        let text = render_lab_reports(&[report]);

        assert!(text.contains("[ ] Place two hosts (hosts)"));
        assert!(text.contains("Progress: 1/3 (33%)"));
        assert!(text.contains("Nodes: 1/2"));
        assert!(text.contains("Messages: 4/4"));
        assert!(!text.contains("Connections"));
    }

    #[test]
    fn test_empty_lab_list() {
        assert!(render_lab_reports(&[]).contains("No labs defined."));
    }

    #[test]
    fn test_validation_rendering() {
        let mut topology = Topology::new();
        topology.add_node(Node::new("q", NodeType::QuantumHost)).unwrap();
        let text = render_validation_report(&validate_static_topology(&topology, "island"));
        assert!(text.contains("Topology: island"));
        assert!(text.contains("Status: INVALID (2 issue(s))"));
        assert!(text.contains("Port Error: Quantum Host 'q' has 0 connections."));
    }

    #[test]
    fn test_write_json_report() {
        let topology = Topology::new();
        let report = LabReport::evaluate(&lab(Requirement::default()), &topology, 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.json");
        write_json_report(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["lab_id"], "hosts");
        assert_eq!(value["progress"]["satisfied"], true);
        assert!(value["progress"].get("error").is_none());
    }
}
