//! Broken, unresolvable and excluded inputs degrade the report instead of
//! failing the run

use tempfile::tempdir;
use tfdeps::{Analyzer, DiagnosticKind, ErrorSeverity, TfdepsError};

use super::fixtures::{analyze, settings_for, write};

#[test]
fn test_unparseable_unit_becomes_stub() {
    let dir = tempdir().unwrap();
    write(dir.path(), "broken/terragrunt.hcl", "dependency \"vpc\" {\n  config_path = \n");
    write(
        dir.path(),
        "app/terragrunt.hcl",
        "dependency \"broken\" {\n  config_path = \"../broken\"\n}\n",
    );

    let report = analyze(dir.path());

    assert_eq!(report.total_modules, 2);
    let broken = &report.modules["broken"];
    assert!(broken.stub);
    assert!(broken.dependencies.is_empty());
    assert!(!report.modules["app"].stub);

    // The stub is still a valid target
    assert_eq!(report.modules["app"].dependencies, vec!["broken"]);

    let syntax: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Syntax)
        .collect();
    assert_eq!(syntax.len(), 1);
    assert_eq!(syntax[0].severity, ErrorSeverity::Error);
    assert_eq!(syntax[0].path.as_deref(), Some("broken/terragrunt.hcl"));
    assert_eq!(report.error_count(), 1);
}

#[test]
fn test_one_broken_file_keeps_the_rest_of_the_unit() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "app/terragrunt.hcl",
        "terraform {\n  source = \"git::https://example.com/app.git\"\n}\n",
    );
    write(dir.path(), "app/main.tf", "resource \"aws_instance\" {\n");

    let report = analyze(dir.path());

    let app = &report.modules["app"];
    assert!(!app.stub);
    assert_eq!(app.source, "git::https://example.com/app.git");
    assert_eq!(app.files, vec!["app/main.tf", "app/terragrunt.hcl"]);
}

#[test]
fn test_unresolvable_dependencies_are_diagnosed() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "live/app/terragrunt.hcl",
        r#"
dependency "ghost" {
  config_path = "../ghost"
}

dependency "outside" {
  config_path = "../../../../elsewhere"
}

dependency "computed" {
  config_path = "${get_parent_terragrunt_dir()}/vpc"
}
"#,
    );

    let report = analyze(dir.path());

    assert_eq!(report.total_modules, 1);
    assert_eq!(report.total_dependencies, 0);

    let resolution: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Resolution)
        .collect();
    assert_eq!(resolution.len(), 3, "{:?}", report.diagnostics);
    assert!(resolution
        .iter()
        .any(|d| d.message.contains("outside the scan root")));
    assert!(resolution
        .iter()
        .any(|d| d.message.contains("does not match any scanned module")));
}

#[test]
fn test_default_excludes_skip_caches() {
    let dir = tempdir().unwrap();
    write(dir.path(), "app/terragrunt.hcl", "");
    write(
        dir.path(),
        "app/.terragrunt-cache/abc/def/terragrunt.hcl",
        "dependency \"x\" {\n  config_path = \"../../../missing\"\n}\n",
    );
    write(dir.path(), "app/.terraform/modules/vpc/main.tf", "output \"id\" {\n  value = 1\n}\n");

    let report = analyze(dir.path());

    assert_eq!(report.modules.keys().collect::<Vec<_>>(), vec!["app"]);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn test_custom_excludes_and_depth() {
    let dir = tempdir().unwrap();
    write(dir.path(), "live/app/terragrunt.hcl", "");
    write(dir.path(), "legacy/old/terragrunt.hcl", "");
    write(dir.path(), "live/deep/a/b/c/terragrunt.hcl", "");

    let mut settings = settings_for(dir.path());
    settings.exclude_patterns = vec!["legacy".to_string()];
    settings.max_depth = Some(3);

    let report = Analyzer::new(settings).analyze().unwrap();

    assert_eq!(report.modules.keys().collect::<Vec<_>>(), vec!["live/app"]);
}

#[test]
fn test_empty_tree_produces_empty_report() {
    let dir = tempdir().unwrap();

    let report = analyze(dir.path());

    assert_eq!(report.total_modules, 0);
    assert_eq!(report.total_dependencies, 0);
    assert!(report.deployment_layers.is_empty());
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let settings = settings_for(&dir.path().join("nope"));

    match Analyzer::new(settings).analyze() {
        Err(TfdepsError::InvalidPath { .. }) => {}
        other => panic!("Expected InvalidPath, got {:?}", other.map(|r| r.total_modules)),
    }
}
