//! End-to-end scenarios over realistic unit trees

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tfdeps::{create_exporter, EdgeKind, OutputFormat};

use super::fixtures::{analyze, aws_stack, induce_vpc_ec2_cycle, two_tier_stack};

#[test]
fn test_aws_stack_has_four_edges_and_no_cycles() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());

    let report = analyze(dir.path());

    assert_eq!(report.total_modules, 4);
    assert_eq!(report.total_dependencies, 4);
    assert_eq!(report.total_cycles, 0);
    assert!(report.circular_dependencies.is_empty());
    assert!(report.refactoring_suggestions.is_empty());
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    assert_eq!(report.modules["rds"].dependencies, vec!["securitygroup", "vpc"]);
    assert_eq!(report.modules["securitygroup"].dependencies, vec!["vpc"]);
    assert_eq!(report.modules["ec2"].dependencies, vec!["vpc"]);
    assert!(report.modules["vpc"].dependencies.is_empty());
    assert_eq!(
        report.modules["vpc"].dependents,
        vec!["ec2", "rds", "securitygroup"]
    );
    assert_eq!(report.modules["vpc"].source, "../modules//vpc");

    assert_eq!(
        report.deployment_layers,
        vec![
            vec!["vpc".to_string()],
            vec!["ec2".to_string(), "securitygroup".to_string()],
            vec!["rds".to_string()],
        ]
    );
}

#[test]
fn test_two_tier_stack_declares_four_edges() {
    let dir = tempdir().unwrap();
    two_tier_stack(dir.path());

    let report = analyze(dir.path());

    assert_eq!(report.total_modules, 5);
    assert_eq!(
        report.modules.keys().collect::<Vec<_>>(),
        vec!["db", "ec2", "rds", "securitygroup", "vpc"]
    );
    assert_eq!(report.total_dependencies, 4);
    let edges: Vec<String> = report
        .edges
        .iter()
        .map(|e| format!("{}->{}", e.from, e.to))
        .collect();
    assert_eq!(
        edges,
        vec![
            "securitygroup->ec2",
            "securitygroup->rds",
            "vpc->ec2",
            "vpc->rds",
        ]
    );
    assert!(report.edges.iter().all(|e| e.kind == EdgeKind::Explicit));
    assert_eq!(report.total_cycles, 0);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    for unit in ["ec2", "rds"] {
        let module = &report.modules[unit];
        assert_eq!(module.declared_dependencies, vec!["securitygroup", "vpc"]);
        assert!(module.inferred_references.is_empty());
        assert!(module.dependents.is_empty());
    }
    assert_eq!(report.modules["rds"].source, "../db");
    assert!(report.modules["db"].dependencies.is_empty());
    assert!(report.modules["db"].dependents.is_empty());
    assert_eq!(report.modules["ec2"].data_sources, vec!["aws_ami.ubuntu"]);

    assert_eq!(
        report.dependency_paths.keys().collect::<Vec<_>>(),
        vec!["securitygroup->ec2", "securitygroup->rds", "vpc->ec2", "vpc->rds"]
    );
    assert_eq!(report.dependency_paths["vpc->rds"], vec![vec!["vpc", "rds"]]);

    assert_eq!(
        report.deployment_layers,
        vec![
            vec!["db".to_string(), "securitygroup".to_string(), "vpc".to_string()],
            vec!["ec2".to_string(), "rds".to_string()],
        ]
    );
}

#[test]
fn test_aws_stack_impact() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());

    let report = analyze(dir.path());

    let vpc = report.impact_of("vpc").unwrap();
    assert_eq!(vpc.affected_modules, vec!["ec2", "rds", "securitygroup"]);
    assert_eq!(vpc.impact_count, 3);
    // Three dependents is not more than the threshold
    assert!(report.impact_analysis.high_impact_modules.is_empty());

    assert!(report.impact_of("rds").unwrap().affected_modules.is_empty());
    assert!(report.impact_of("missing").is_err());
}

#[test]
fn test_induced_cycle_is_reported_once() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());
    induce_vpc_ec2_cycle(dir.path());

    let report = analyze(dir.path());

    assert_eq!(report.total_modules, 4);
    assert_eq!(report.total_dependencies, 5);
    assert_eq!(report.total_cycles, 1);
    assert_eq!(
        report.circular_dependencies[0].as_slice(),
        ["ec2", "vpc", "ec2"]
    );

    let back_edge = report
        .edges
        .iter()
        .find(|e| e.from == "ec2" && e.to == "vpc")
        .unwrap();
    assert_eq!(back_edge.kind, EdgeKind::Inferred);
    assert!(report.is_cycle_edge(back_edge));

    // The registry module invocation stays internal to vpc
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(report.modules["vpc"].outputs, vec!["bastion_ip", "vpc_id"]);

    let suggestions = &report.refactoring_suggestions[0];
    assert_eq!(suggestions.cycle, report.circular_dependencies[0]);
    assert_eq!(suggestions.suggestions.len(), 3);
    let lookup = suggestions
        .suggestions
        .iter()
        .find(|s| s.message.contains("indirect lookup"))
        .unwrap();
    assert_eq!(lookup.modules, vec!["ec2", "vpc"]);
    assert!(lookup.message.contains("inferred edge ec2 -> vpc"));
}

#[test]
fn test_induced_cycle_edge_is_marked_by_exporters() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());
    induce_vpc_ec2_cycle(dir.path());

    let report = analyze(dir.path());

    let dot = create_exporter(OutputFormat::Dot).export(&report).unwrap();
    assert!(dot.contains("\"ec2\" -> \"vpc\" [style=dashed, color=red, penwidth=2];"));
    assert!(dot.contains("\"vpc\" -> \"ec2\" [color=red, penwidth=2];"));
    assert!(dot.contains("\"vpc\" -> \"rds\";"));

    let mermaid = create_exporter(OutputFormat::Mermaid).export(&report).unwrap();
    assert!(mermaid.contains("%% cycle: ec2 -> vpc -> ec2"));
    assert_eq!(mermaid.matches("linkStyle").count(), 2);

    let html = create_exporter(OutputFormat::Html).export(&report).unwrap();
    assert!(html.contains("class=\"edge inferred cycle\" data-from=\"ec2\" data-to=\"vpc\""));
    assert!(html.contains("class=\"edge cycle\" data-from=\"vpc\" data-to=\"ec2\""));

    let json: serde_json::Value =
        serde_json::from_str(&create_exporter(OutputFormat::Json).export(&report).unwrap())
            .unwrap();
    assert_eq!(json["total_cycles"], 1);
    assert_eq!(
        json["circular_dependencies"],
        serde_json::json!([["ec2", "vpc", "ec2"]])
    );
}
