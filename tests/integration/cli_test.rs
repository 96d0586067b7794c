//! Command-line surface: argument parsing and end-to-end command runs

use std::fs;
use std::path::Path;

use clap::Parser;
use tempfile::tempdir;
use tfdeps::cli::{Args, Command, FormatArg};
use tfdeps::TfdepsError;

use super::fixtures::{aws_stack, induce_vpc_ec2_cycle};

/// Run the analyze command against `root`, writing the report to a file
fn run(root: &Path, extra: &[&str]) -> Result<String, TfdepsError> {
    let work = tempdir().unwrap();
    let config = work.path().join("empty.toml");
    fs::write(&config, "").unwrap();
    let output = work.path().join("report.out");

    let mut argv = vec![
        "tfdeps".to_string(),
        "--path".to_string(),
        root.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--output".to_string(),
        output.display().to_string(),
        "--quiet".to_string(),
        "--no-progress".to_string(),
        "--no-timestamp".to_string(),
    ];
    argv.extend(extra.iter().map(|arg| arg.to_string()));

    let args = Args::try_parse_from(argv).unwrap();
    Command::from_args(args).execute()?;
    Ok(fs::read_to_string(output).unwrap())
}

#[test]
fn test_args_defaults() {
    let args = Args::try_parse_from(["tfdeps"]).unwrap();
    assert!(args.path.is_none());
    assert!(args.format.is_none());
    assert!(args.exclude.is_empty());
    assert!(!args.quiet);
    assert!(!args.init);
}

#[test]
fn test_args_all_formats() {
    for (name, expected) in [
        ("json", FormatArg::Json),
        ("dot", FormatArg::Dot),
        ("mermaid", FormatArg::Mermaid),
        ("html", FormatArg::Html),
    ] {
        let args = Args::try_parse_from(["tfdeps", "--format", name]).unwrap();
        assert_eq!(args.format, Some(expected));
    }
}

#[test]
fn test_args_rejects_unknown_format_and_conflicts() {
    assert!(Args::try_parse_from(["tfdeps", "--format", "yaml"]).is_err());
    assert!(Args::try_parse_from(["tfdeps", "--quiet", "--verbose"]).is_err());
}

#[test]
fn test_analyze_writes_json_report() {
    let temp_dir = tempdir().unwrap();
    aws_stack(temp_dir.path());

    let rendered = run(temp_dir.path(), &[]).unwrap();
    let report: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(report["total_modules"], 4);
    assert_eq!(report["total_dependencies"], 4);
    assert_eq!(report["circular_dependencies"], serde_json::json!([]));
    assert_eq!(report["generated_at"], serde_json::Value::Null);
    assert_eq!(
        report["modules"]["rds"]["dependencies"],
        serde_json::json!(["securitygroup", "vpc"])
    );
}

#[test]
fn test_analyze_renders_requested_format() {
    let temp_dir = tempdir().unwrap();
    aws_stack(temp_dir.path());
    induce_vpc_ec2_cycle(temp_dir.path());

    let dot = run(temp_dir.path(), &["--format", "dot"]).unwrap();
    assert!(dot.starts_with("digraph dependencies {"));
    assert!(dot.contains("// cycle: ec2 -> vpc -> ec2"));

    let mermaid = run(temp_dir.path(), &["--format", "mermaid"]).unwrap();
    assert!(mermaid.starts_with("graph TD\n"));
}

#[test]
fn test_impact_flag_prints_downstream_set() {
    let temp_dir = tempdir().unwrap();
    aws_stack(temp_dir.path());

    let rendered = run(temp_dir.path(), &["--impact", "vpc"]).unwrap();
    assert!(rendered.starts_with("vpc affects 3 module(s)\n"));
    for id in ["ec2", "rds", "securitygroup"] {
        assert!(rendered.contains(&format!("  {}\n", id)));
    }
}

#[test]
fn test_impact_flag_unknown_module() {
    let temp_dir = tempdir().unwrap();
    aws_stack(temp_dir.path());

    assert!(matches!(
        run(temp_dir.path(), &["--impact", "nope"]),
        Err(TfdepsError::UnknownModule { id }) if id == "nope"
    ));
}

#[test]
fn test_missing_path_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("does-not-exist");

    assert!(matches!(
        run(&missing, &[]),
        Err(TfdepsError::InvalidPath { .. })
    ));
}
