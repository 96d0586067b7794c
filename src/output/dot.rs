//! Graphviz DOT exporter

use std::fmt::Write;

use super::{escape_quoted, Exporter};
use crate::error::Result;
use crate::models::analysis::{AnalysisReport, ModuleReport};
use crate::models::dependency_graph::EdgeKind;

/// Graphviz digraph with cycle edges in red and inferred edges dashed
#[derive(Debug, Default)]
pub struct DotExporter;

impl DotExporter {
    pub fn new() -> Self {
        Self
    }

    fn node_attributes(id: &str, module: &ModuleReport, in_cycle: bool) -> Vec<String> {
        let mut label = escape_quoted(id);
        if module.stub {
            label.push_str("\\n(stub)");
        }
        let mut attributes = vec![format!("label=\"{}\"", label)];

        let isolated = module.dependencies.is_empty() && module.dependents.is_empty();
        if module.stub {
            attributes.push("style=\"rounded,dashed\"".to_string());
            attributes.push("fontcolor=gray40".to_string());
        } else if isolated {
            attributes.push("style=\"rounded,filled\"".to_string());
            attributes.push("fillcolor=gray90".to_string());
        }
        if in_cycle {
            attributes.push("color=red".to_string());
        }
        attributes
    }
}

impl Exporter for DotExporter {
    fn export(&self, report: &AnalysisReport) -> Result<String> {
        let cycle_edges = report.cycle_edges();
        let cycle_members = report.cycle_members();
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "digraph dependencies {{");
        let _ = writeln!(out, "    rankdir=TB;");
        let _ = writeln!(out, "    node [shape=box, style=rounded, fontname=\"Helvetica\"];");
        let _ = writeln!(out, "    edge [color=gray30];");

        for cycle in &report.circular_dependencies {
            let _ = writeln!(out, "    // cycle: {}", cycle);
        }
        out.push('\n');

        for (id, module) in &report.modules {
            let attributes =
                Self::node_attributes(id, module, cycle_members.contains(id.as_str()));
            let _ = writeln!(
                out,
                "    \"{}\" [{}];",
                escape_quoted(id),
                attributes.join(", ")
            );
        }

        if !report.edges.is_empty() {
            out.push('\n');
        }

        for edge in &report.edges {
            let mut attributes = Vec::new();
            if edge.kind == EdgeKind::Inferred {
                attributes.push("style=dashed".to_string());
            }
            if cycle_edges.contains(&(edge.from.clone(), edge.to.clone())) {
                attributes.push("color=red".to_string());
                attributes.push("penwidth=2".to_string());
            }

            let _ = write!(
                out,
                "    \"{}\" -> \"{}\"",
                escape_quoted(&edge.from),
                escape_quoted(&edge.to)
            );
            if attributes.is_empty() {
                out.push_str(";\n");
            } else {
                let _ = writeln!(out, " [{}];", attributes.join(", "));
            }
        }

        out.push_str("}\n");
        Ok(out)
    }
}
