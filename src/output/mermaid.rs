//! Mermaid flowchart exporter

use std::collections::BTreeMap;
use std::fmt::Write;

use super::Exporter;
use crate::error::Result;
use crate::models::analysis::AnalysisReport;
use crate::models::dependency_graph::EdgeKind;

const CYCLE_LINK_STYLE: &str = "stroke:#d32f2f,stroke-width:3px";

/// `graph TD` flowchart. Node ids are `n0`, `n1`, ... in module id order
/// so arbitrary paths never leak into Mermaid syntax.
#[derive(Debug, Default)]
pub struct MermaidExporter;

impl MermaidExporter {
    pub fn new() -> Self {
        Self
    }
}

fn label(id: &str) -> String {
    id.replace('"', "#quot;")
}

impl Exporter for MermaidExporter {
    fn export(&self, report: &AnalysisReport) -> Result<String> {
        let node_ids: BTreeMap<&str, String> = report
            .modules
            .keys()
            .enumerate()
            .map(|(index, id)| (id.as_str(), format!("n{}", index)))
            .collect();
        let cycle_edges = report.cycle_edges();
        let mut out = String::from("graph TD\n");

        for cycle in &report.circular_dependencies {
            let _ = writeln!(out, "    %% cycle: {}", cycle);
        }

        for (id, node) in &node_ids {
            let _ = writeln!(out, "    {}[\"{}\"]", node, label(id));
        }

        let mut highlighted = Vec::new();
        let mut link_index = 0;
        for edge in &report.edges {
            let (Some(from), Some(to)) = (
                node_ids.get(edge.from.as_str()),
                node_ids.get(edge.to.as_str()),
            ) else {
                continue;
            };
            let arrow = match edge.kind {
                EdgeKind::Explicit => "-->",
                EdgeKind::Inferred => "-.->",
            };
            let _ = writeln!(out, "    {} {} {}", from, arrow, to);

            if cycle_edges.contains(&(edge.from.clone(), edge.to.clone())) {
                highlighted.push(link_index);
            }
            link_index += 1;
        }

        for index in highlighted {
            let _ = writeln!(out, "    linkStyle {} {}", index, CYCLE_LINK_STYLE);
        }

        let stubs: Vec<&str> = report
            .modules
            .iter()
            .filter(|(_, module)| module.stub)
            .filter_map(|(id, _)| node_ids.get(id.as_str()).map(String::as_str))
            .collect();
        if !stubs.is_empty() {
            out.push_str("    classDef stub stroke-dasharray: 5 5,color:#666\n");
            let _ = writeln!(out, "    class {} stub", stubs.join(","));
        }

        let members = report.cycle_members();
        let in_cycle: Vec<&str> = node_ids
            .iter()
            .filter(|(id, _)| members.contains(*id))
            .map(|(_, node)| node.as_str())
            .collect();
        if !in_cycle.is_empty() {
            out.push_str("    classDef cycle stroke:#d32f2f,stroke-width:2px\n");
            let _ = writeln!(out, "    class {} cycle", in_cycle.join(","));
        }

        Ok(out)
    }
}
