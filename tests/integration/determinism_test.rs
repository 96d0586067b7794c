//! Repeated and parallel runs must agree byte for byte

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tfdeps::{create_exporter, Analyzer, OutputFormat};

use super::fixtures::{analyze, aws_stack, induce_vpc_ec2_cycle, settings_for, write};

const FORMATS: [OutputFormat; 4] = [
    OutputFormat::Json,
    OutputFormat::Dot,
    OutputFormat::Mermaid,
    OutputFormat::Html,
];

#[test]
fn test_repeated_runs_are_byte_identical_without_timestamp() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());
    induce_vpc_ec2_cycle(dir.path());

    let first = analyze(dir.path());
    let second = analyze(dir.path());
    assert!(first.generated_at.is_none());

    for format in FORMATS {
        let exporter = create_exporter(format);
        assert_eq!(
            exporter.export(&first).unwrap(),
            exporter.export(&second).unwrap(),
            "{} differs",
            format
        );
    }
}

#[test]
fn test_fixed_timestamp_is_reproducible() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single();

    let analyzer = Analyzer::new(settings_for(dir.path()));
    let first = analyzer.analyze_at(at).unwrap();
    let second = analyzer.analyze_at(at).unwrap();

    let json = create_exporter(OutputFormat::Json);
    let rendered = json.export(&first).unwrap();
    assert_eq!(rendered, json.export(&second).unwrap());
    assert!(rendered.contains("\"generated_at\": \"2025-06-01T12:00:00Z\""));
}

#[test]
fn test_timestamp_included_by_default_setting() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());
    let mut settings = settings_for(dir.path());
    settings.include_timestamp = true;

    let report = Analyzer::new(settings).analyze().unwrap();
    assert!(report.generated_at.is_some());
}

#[test]
fn test_parallel_and_sequential_agree() {
    let dir = tempdir().unwrap();
    aws_stack(dir.path());
    induce_vpc_ec2_cycle(dir.path());
    for i in 0..24 {
        write(
            dir.path(),
            &format!("services/svc{:02}/terragrunt.hcl", i),
            &format!(
                "dependency \"vpc\" {{\n  config_path = \"../../vpc\"\n}}\n\ninputs = {{\n  name = \"svc{:02}\"\n  vpc  = dependency.vpc.outputs.vpc_id\n}}\n",
                i
            ),
        );
    }
    write(dir.path(), "services/broken/terragrunt.hcl", "dependency \"vpc\" {\n");

    let mut parallel = settings_for(dir.path());
    parallel.parallel = true;
    let mut sequential = settings_for(dir.path());
    sequential.parallel = false;

    let parallel_report = Analyzer::new(parallel).analyze().unwrap();
    let sequential_report = Analyzer::new(sequential).analyze().unwrap();

    assert_eq!(parallel_report, sequential_report);
    assert_eq!(parallel_report.total_modules, 4 + 24 + 1);
    let json = create_exporter(OutputFormat::Json);
    assert_eq!(
        json.export(&parallel_report).unwrap(),
        json.export(&sequential_report).unwrap()
    );
}
