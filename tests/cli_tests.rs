//! CLI command handler tests

use fieldsmith::cli::commands;
use fieldsmith::types::RunConfig;
use std::path::PathBuf;
use tempfile::TempDir;

fn offline_config() -> RunConfig {
    RunConfig {
        app_id: "APP123".to_string(),
        workplace_id: "WP456".to_string(),
        api_key: "dummy".to_string(),
        requesting_user: "ops@example.com".to_string(),
        endpoint: "http://localhost:1".to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CHECK COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_check_sample_template() {
    let result = commands::check(PathBuf::from("test-data/sample-template.csv"));
    assert!(result.is_ok(), "check should succeed on the sample template");
}

#[test]
fn test_check_nonexistent_file() {
    let result = commands::check(PathBuf::from("nonexistent.csv"));
    assert!(result.is_err(), "check should fail on a missing file");
}

#[test]
fn test_check_rejects_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cycle.csv");
    std::fs::write(
        &path,
        "sectionIndex,fieldIndex,fieldType,label,formula\n\
         1,1,calculationsAndLogic,A,{3}\n\
         1,2,calculationsAndLogic,B,{2}\n",
    )
    .unwrap();

    assert!(commands::check(path).is_err());
}

#[test]
fn test_check_rejects_out_of_range_reference() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad-ref.csv");
    std::fs::write(
        &path,
        "sectionIndex,fieldIndex,fieldType,label,formula\n\
         1,1,calculationsAndLogic,A,{40}\n",
    )
    .unwrap();

    assert!(commands::check(path).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// PLAN COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_plan_sample_template() {
    let result = commands::plan(PathBuf::from("test-data/sample-template.csv"), false);
    assert!(result.is_ok());
}

#[test]
fn test_plan_verbose() {
    let result = commands::plan(PathBuf::from("test-data/sample-template.csv"), true);
    assert!(result.is_ok());
}

#[test]
fn test_plan_nonexistent_file() {
    assert!(commands::plan(PathBuf::from("nonexistent.csv"), false).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// PUSH COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_push_dry_run_makes_no_remote_calls() {
    // The endpoint is unroutable; a dry run must succeed anyway
    let result = commands::push(
        PathBuf::from("test-data/sample-template.csv"),
        offline_config(),
        false, // two_pass
        true,  // dry_run
        true,  // verbose
    );
    assert!(result.is_ok(), "dry run must not touch the network");
}

#[test]
fn test_push_dry_run_still_validates_structure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cycle.csv");
    std::fs::write(
        &path,
        "sectionIndex,fieldIndex,fieldType,label,formula\n\
         1,1,calculationsAndLogic,A,{2}\n",
    )
    .unwrap();

    let result = commands::push(path, offline_config(), false, true, false);
    assert!(result.is_err(), "self-reference must fail even in dry run");
}
