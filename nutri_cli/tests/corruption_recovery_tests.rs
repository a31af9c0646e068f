//! Corruption recovery tests for nutrilog.
//!
//! These tests verify the tracker keeps working with:
//! - A corrupted store file
//! - Malformed individual values inside a valid store
//! - Corrupted or partial journal lines

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("nutrilog"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_store_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("store.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted store");

    cli()
        .arg("summary")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: not recorded"))
        .stdout(predicate::str::contains("Water: 0/8 glasses"));

    // The next write replaces the corrupt file with a valid one
    cli()
        .args(["water", "add"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    let contents = fs::read_to_string(data_dir.join("store.json")).unwrap();
    let store: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(store["water_intake"], "1");
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let store = serde_json::json!({
        "user_bmi": "abc",
        "user_category": "Normal",
        "water_intake": "three",
        "water_goal": "0",
        "meals_data": "not a ledger",
    });
    fs::write(data_dir.join("store.json"), store.to_string()).unwrap();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: not recorded"))
        .stdout(predicate::str::contains("Calories: 0 / 2000 kcal"))
        .stdout(predicate::str::contains("Water: 0/8 glasses"));
}

#[test]
fn test_corrupted_journal_lines_are_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["meal", "add", "lunch", "Rice", "200"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    // Simulate a crash mid-append followed by garbage
    let journal_path = data_dir.join("journal/activity.jsonl");
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&journal_path)
        .unwrap();
    writeln!(file, "{{ invalid json }}").unwrap();
    write!(file, r#"{{"id":"00000000-0000-0000-0000-000000000000","at":"#).unwrap();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("200 kcal"));
}

#[test]
fn test_missing_data_dir_is_created() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("nested/data");

    cli()
        .args(["water", "add"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    assert!(data_dir.join("store.json").exists());
    assert!(data_dir.join("journal/activity.jsonl").exists());
}
