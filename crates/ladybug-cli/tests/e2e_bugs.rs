//! E2E tests for the bugs surface: list filters, create, update, delete,
//! and JSON contract checks.
//!
//! Each test runs the `lb` binary as a subprocess. State is in-memory and
//! seeded per invocation, so every command sees the same starting dataset.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn lb_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lb"));
    // Suppress tracing output that goes to stderr
    cmd.env("LADYBUG_LOG", "error");
    cmd
}

fn bugs_json(args: &[&str]) -> Value {
    let mut full_args = vec!["bugs"];
    full_args.extend_from_slice(args);
    full_args.push("--json");
    let output = lb_cmd()
        .args(&full_args)
        .output()
        .expect("bugs command should not crash");
    assert!(
        output.status.success(),
        "bugs {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("bugs --json should produce valid JSON")
}

#[test]
fn list_returns_the_seeded_bugs() {
    let json = bugs_json(&["list"]);
    assert_eq!(json["total"].as_u64(), Some(5));
    let bugs = json["bugs"].as_array().expect("bugs array");
    assert_eq!(bugs.len(), 5);
    // Default sort is updated_at descending.
    assert_eq!(
        bugs[0]["title"].as_str(),
        Some("Mobile Layout Broken on Small Screens")
    );
}

#[test]
fn list_filters_compose_as_a_conjunction() {
    let json = bugs_json(&["list", "--status", "new", "--severity", "high"]);
    assert_eq!(json["total"].as_u64(), Some(1));
    assert_eq!(
        json["bugs"][0]["title"].as_str(),
        Some("Login Authentication Bypass")
    );
}

#[test]
fn list_search_misses_yield_empty_not_error() {
    let json = bugs_json(&["list", "--search", "no such bug anywhere"]);
    assert_eq!(json["total"].as_u64(), Some(0));
    assert_eq!(json["bugs"].as_array().map(Vec::len), Some(0));
}

#[test]
fn list_sorts_by_severity_rank() {
    let json = bugs_json(&["list", "--sort", "severity"]);
    let severities: Vec<&str> = json["bugs"]
        .as_array()
        .expect("array")
        .iter()
        .map(|b| b["severity"].as_str().expect("severity"))
        .collect();
    assert_eq!(severities, vec!["high", "high", "medium", "medium", "low"]);
}

#[test]
fn list_rejects_unknown_status() {
    lb_cmd()
        .args(["bugs", "list", "--status", "reopened"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status"));
}

#[test]
fn create_assigns_the_next_id() {
    let output = lb_cmd()
        .args([
            "bugs",
            "create",
            "--title",
            "Avatar upload fails",
            "--description",
            "PNG uploads over 2MB return a 500",
            "--bucket",
            "2",
            "--json",
        ])
        .output()
        .expect("create should not crash");
    assert!(
        output.status.success(),
        "create failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    // Seed tops out at id 5.
    assert_eq!(json["id"].as_u64(), Some(6));
    assert_eq!(json["status"].as_str(), Some("new"));
    assert_eq!(json["bucket"].as_str(), Some("Backend Issues"));
}

#[test]
fn create_without_required_fields_fails_with_code() {
    let output = lb_cmd()
        .args(["bugs", "create", "--title", "Only a title", "--json"])
        .output()
        .expect("create should not crash");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("error JSON on stderr");
    assert_eq!(json["error"]["error_code"].as_str(), Some("E2001"));
    let message = json["error"]["message"].as_str().expect("message");
    assert!(message.contains("description"));
    assert!(message.contains("bucket"));
}

#[test]
fn create_rejects_unknown_bucket() {
    lb_cmd()
        .args([
            "bugs",
            "create",
            "--title",
            "t",
            "--description",
            "d",
            "--bucket",
            "99",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket 99 not found"));
}

#[test]
fn update_transitions_status() {
    let output = lb_cmd()
        .args(["bugs", "update", "1", "--status", "resolved", "--json"])
        .output()
        .expect("update should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["id"].as_u64(), Some(1));
    assert_eq!(json["status"].as_str(), Some("resolved"));
}

#[test]
fn update_absent_id_is_not_found() {
    let output = lb_cmd()
        .args(["bugs", "update", "42", "--status", "resolved", "--json"])
        .output()
        .expect("update should not crash");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("error JSON");
    assert_eq!(json["error"]["error_code"].as_str(), Some("E2002"));
}

#[test]
fn delete_reports_the_removed_bug() {
    lb_cmd()
        .args(["bugs", "delete", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Missing Validation on Form Fields"));
}

#[test]
fn delete_absent_id_fails() {
    lb_cmd()
        .args(["bugs", "delete", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bug 42 not found"));
}
