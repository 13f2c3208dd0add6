//! E2E tests for the teams, buckets, and bounties surfaces, including the
//! restrict-delete policies.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn lb_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lb"));
    cmd.env("LADYBUG_LOG", "error");
    cmd
}

#[test]
fn teams_list_includes_rosters() {
    let output = lb_cmd()
        .args(["teams", "list", "--json"])
        .output()
        .expect("teams list should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["total"].as_u64(), Some(2));
    let qa = &json["teams"][0];
    assert_eq!(qa["name"].as_str(), Some("QA Team"));
    assert_eq!(qa["members"].as_array().map(Vec::len), Some(3));
    assert_eq!(qa["members"][0]["name"].as_str(), Some("Jamie Smith"));
}

#[test]
fn teams_add_requires_a_name() {
    let output = lb_cmd()
        .args(["teams", "add", "--name", "   ", "--json"])
        .output()
        .expect("teams add should not crash");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("error JSON");
    assert_eq!(json["error"]["error_code"].as_str(), Some("E2001"));
}

#[test]
fn add_member_allocates_a_globally_unique_id() {
    // Seed members end at id 6, regardless of which team grows.
    lb_cmd()
        .args([
            "teams",
            "add-member",
            "--team",
            "1",
            "--name",
            "Riley Chen",
            "--designation",
            "SRE",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("member 7 added"));
}

#[test]
fn deleting_a_referenced_team_is_restricted() {
    let output = lb_cmd()
        .args(["teams", "delete", "1", "--json"])
        .output()
        .expect("teams delete should not crash");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("error JSON");
    assert_eq!(json["error"]["error_code"].as_str(), Some("E2003"));
    assert!(json["error"]["message"]
        .as_str()
        .expect("message")
        .contains("cannot delete team 1"));
}

#[test]
fn deleting_a_bucket_with_bugs_is_restricted() {
    lb_cmd()
        .args(["buckets", "delete", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("referenced by bugs"));
}

#[test]
fn deleting_an_unreferenced_bucket_succeeds() {
    // Bucket 4 (Functional Testing) has no seed bugs.
    lb_cmd()
        .args(["buckets", "delete", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bucket 4 deleted"));
}

#[test]
fn buckets_add_requires_an_existing_team() {
    lb_cmd()
        .args(["buckets", "add", "--name", "Docs", "--team", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("team 99 not found"));
}

#[test]
fn bounties_list_groups_by_cadence() {
    let output = lb_cmd()
        .args(["bounties", "list", "--cadence", "sprint", "--json"])
        .output()
        .expect("bounties list should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["total"].as_u64(), Some(2));
    assert!(json["bounties"]
        .as_array()
        .expect("array")
        .iter()
        .all(|b| b["cadence"].as_str() == Some("sprint")));
}

#[test]
fn bounties_add_normalizes_the_reward() {
    let output = lb_cmd()
        .args([
            "bounties",
            "add",
            "--title",
            "Close ten stale bugs",
            "--deadline",
            "2023-05-01",
            "--target",
            "10",
            "--reward",
            "120",
            "--cadence",
            "weekly",
            "--json",
        ])
        .output()
        .expect("bounties add should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["id"].as_u64(), Some(7));
    assert_eq!(json["reward"].as_str(), Some("$120"));
    assert_eq!(json["current"].as_u64(), Some(0));
}

#[test]
fn bounties_add_rejects_a_zero_target() {
    let output = lb_cmd()
        .args([
            "bounties",
            "add",
            "--title",
            "t",
            "--deadline",
            "2023-05-01",
            "--target",
            "0",
            "--reward",
            "10",
            "--json",
        ])
        .output()
        .expect("bounties add should not crash");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("error JSON");
    assert_eq!(json["error"]["error_code"].as_str(), Some("E2001"));
}
