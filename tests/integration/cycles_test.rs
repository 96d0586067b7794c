//! Cycle detection over real unit trees

use tempfile::tempdir;
use tfdeps::DiagnosticKind;

use super::fixtures::{analyze, write};

fn unit(root: &std::path::Path, id: &str, deps: &[&str]) {
    let mut content = String::new();
    for dep in deps {
        content.push_str(&format!(
            "dependency \"{}\" {{\n  config_path = \"../{}\"\n}}\n\n",
            dep, dep
        ));
    }
    write(root, &format!("{}/terragrunt.hcl", id), &content);
}

#[test]
fn test_three_cycle_found_exactly_once() {
    let dir = tempdir().unwrap();
    // a needs c, b needs a, c needs b: a -> b -> c -> a in deployment order
    unit(dir.path(), "a", &["c"]);
    unit(dir.path(), "b", &["a"]);
    unit(dir.path(), "c", &["b"]);

    let report = analyze(dir.path());

    assert_eq!(report.total_cycles, 1);
    assert_eq!(
        report.circular_dependencies[0].as_slice(),
        ["a", "b", "c", "a"]
    );
    assert_eq!(report.circular_dependencies[0].to_string(), "a -> b -> c -> a");
}

#[test]
fn test_overlapping_cycles_sorted_by_length() {
    let dir = tempdir().unwrap();
    unit(dir.path(), "a", &["c", "d"]);
    unit(dir.path(), "b", &["a"]);
    unit(dir.path(), "c", &["b"]);
    unit(dir.path(), "d", &["a"]);

    let report = analyze(dir.path());

    let cycles: Vec<String> = report
        .circular_dependencies
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(cycles, vec!["a -> d -> a", "a -> b -> c -> a"]);
    assert_eq!(report.refactoring_suggestions.len(), 2);
}

#[test]
fn test_no_false_cycles_in_diamond() {
    let dir = tempdir().unwrap();
    unit(dir.path(), "base", &[]);
    unit(dir.path(), "left", &["base"]);
    unit(dir.path(), "right", &["base"]);
    unit(dir.path(), "top", &["left", "right", "base"]);

    let report = analyze(dir.path());

    assert_eq!(report.total_dependencies, 5);
    assert_eq!(report.total_cycles, 0);
    assert_eq!(report.deployment_layers.len(), 3);
}

#[test]
fn test_self_dependency_is_rejected() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "a/terragrunt.hcl",
        r#"
dependency "me" {
  config_path = "../a"
}

dependency "here" {
  config_path = "."
}
"#,
    );

    let report = analyze(dir.path());

    assert_eq!(report.total_modules, 1);
    assert_eq!(report.total_dependencies, 0);
    assert_eq!(report.total_cycles, 0);
    let self_refs: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::SelfReference)
        .collect();
    assert_eq!(self_refs.len(), 1);
    assert_eq!(self_refs[0].module.as_deref(), Some("a"));
}
