//! End-to-end CLI tests
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests
//!
//! Runs the binary against the 80-participant fixture and checks stdout,
//! exit status and the artifacts written to the output directory.

use predicates::prelude::*;
use std::fs;

const FIXTURE: &str = "tests/fixtures/visa_survey.csv";

const CHARTS: [&str; 5] = [
    "main_finding.svg",
    "detailed_metrics.svg",
    "recommendation.svg",
    "effect_sizes.svg",
    "executive_dashboard.svg",
];

fn abreport() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("abreport")
}

#[test]
fn test_text_summary_names_winner() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("-o")
        .arg(out.path())
        .arg(FIXTURE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Participants: 80 (checklist 40, calendar 40)"))
        .stdout(predicate::str::contains("Winner: Checklist View"))
        .stdout(predicate::str::contains("Overall advantage: +1.3"))
        .stdout(predicate::str::contains("Cohen's d = 3.76 (Large)"));
}

#[test]
fn test_all_artifacts_written() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("--output-dir")
        .arg(out.path())
        .arg(FIXTURE)
        .assert()
        .success();

    for file in CHARTS
        .iter()
        .chain(["report.md", "summary.csv", "analysis.json"].iter())
    {
        assert!(out.path().join(file).is_file(), "missing {file}");
    }

    let svg = fs::read_to_string(out.path().join("main_finding.svg")).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("#2E7D32"));
    assert!(svg.contains("Checklist View Significantly Outperforms Calendar View"));

    let report = fs::read_to_string(out.path().join("report.md")).unwrap();
    assert!(report.contains("## Executive Summary"));
    assert!(report.contains("![Main Finding](main_finding.svg)"));

    let csv = fs::read_to_string(out.path().join("summary.csv")).unwrap();
    assert_eq!(csv.lines().count(), 6);
}

#[test]
fn test_no_charts_skips_svg() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("--no-charts")
        .arg("-o")
        .arg(out.path())
        .arg(FIXTURE)
        .assert()
        .success();

    for chart in CHARTS {
        assert!(!out.path().join(chart).exists(), "{chart} should not be rendered");
    }
    let report = fs::read_to_string(out.path().join("report.md")).unwrap();
    assert!(!report.contains("## Charts"));
    assert!(out.path().join("analysis.json").is_file());
}

#[test]
fn test_json_format_on_stdout() {
    let out = tempfile::tempdir().unwrap();
    let assert = abreport()
        .arg("--format")
        .arg("json")
        .arg("-o")
        .arg(out.path())
        .arg(FIXTURE)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["format"], "abreport-json-v1");
    assert_eq!(value["winner"], "Checklist");
    assert_eq!(value["analysis"]["participants"], 80);
    assert_eq!(value["analysis"]["balanced"], true);
    assert_eq!(value["analysis"]["recommendation"]["table"]["counts"][0][0], 36);
}

#[test]
fn test_missing_input_fails() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("-o")
        .arg(out.path())
        .arg("does/not/exist.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load survey data"))
        .stderr(predicate::str::contains("does/not/exist.csv"));
}

#[test]
fn test_malformed_rating_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(
        &input,
        "ParticipantID,Variant,EaseOfUse,LikelyToUse,Clarity,Recommend\n\
         P001,Checklist,5,4,5,Y\n\
         P002,Calendar,three,3,3,N\n",
    )
    .unwrap();

    abreport()
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_single_respondent_group_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.csv");
    fs::write(
        &input,
        "ParticipantID,Variant,EaseOfUse,LikelyToUse,Clarity,Recommend\n\
         P001,Checklist,5,4,5,Y\n\
         P002,Calendar,3,3,3,N\n\
         P003,Calendar,2,3,4,Y\n",
    )
    .unwrap();

    abreport()
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checklist group"));
}

#[test]
fn test_config_file_and_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("abreport.toml");
    fs::write(&config, "yates_correction = true\nsignificance_level = 0.01\n").unwrap();
    let out = dir.path().join("out");

    abreport()
        .arg("--config")
        .arg(&config)
        .arg("--alpha")
        .arg("0.001")
        .arg("-o")
        .arg(&out)
        .arg(FIXTURE)
        .assert()
        .success();

    let json = fs::read_to_string(out.join("analysis.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["config"]["significance_level"], 0.001);
    assert_eq!(value["config"]["yates_correction"], true);
    assert_eq!(
        value["analysis"]["recommendation"]["chi_square"]["yates_corrected"],
        true
    );
}

#[test]
fn test_invalid_config_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("abreport.toml");
    fs::write(&config, "confidence_level = 1.5\n").unwrap();

    abreport()
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(FIXTURE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("confidence_level must be in (0, 1)"));
}

#[test]
fn test_invalid_alpha_override_rejected() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("--alpha")
        .arg("0")
        .arg("-o")
        .arg(out.path())
        .arg(FIXTURE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid analysis configuration"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("-v")
        .arg("-o")
        .arg(out.path())
        .arg(FIXTURE)
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("survey loaded"));
}

fn undersized_design_config(dir: &std::path::Path) -> std::path::PathBuf {
    let config = dir.join("analysis.toml");
    fs::write(&config, "expected_group_size = 30\n").unwrap();
    config
}

#[test]
fn test_rust_log_enables_debug_without_flags() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("-o")
        .arg(out.path())
        .arg(FIXTURE)
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("survey rows loaded"));
}

#[test]
fn test_verbose_flag_keeps_more_detailed_rust_log() {
    let out = tempfile::tempdir().unwrap();
    abreport()
        .arg("-v")
        .arg("-o")
        .arg(out.path())
        .arg(FIXTURE)
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("survey rows loaded"))
        .stderr(predicate::str::contains("survey loaded"));
}

#[test]
fn test_rust_log_error_silences_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let config = undersized_design_config(dir.path());
    abreport()
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(FIXTURE)
        .env("RUST_LOG", "error")
        .assert()
        .success()
        .stderr(predicate::str::contains("unbalanced design").not());
}

#[test]
fn test_warnings_shown_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = undersized_design_config(dir.path());
    abreport()
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(FIXTURE)
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("unbalanced design"))
        .stderr(predicate::str::contains("survey rows loaded").not());
}

#[test]
fn test_output_dir_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    abreport()
        .arg("-o")
        .arg(&nested)
        .arg(FIXTURE)
        .assert()
        .success();
    assert!(nested.join("report.md").is_file());
}
