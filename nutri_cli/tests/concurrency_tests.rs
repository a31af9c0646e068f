//! Concurrency tests for nutrilog.
//!
//! These tests verify that several processes sharing one data directory:
//! - Never lose each other's water or meal updates
//! - Keep the meal total in sync with the ledger
//! - Append one journal line per change

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("nutrilog"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn read_store(data_dir: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(data_dir.join("store.json")).expect("Failed to read store");
    serde_json::from_str(&contents).expect("Store is not valid JSON")
}

/// Run `args` from `count` threads at once against the same data directory
fn run_parallel(data_dir: &Path, count: usize, args: fn(usize) -> Vec<String>) {
    let handles: Vec<_> = (0..count)
        .map(|i| {
            let data_dir: PathBuf = data_dir.to_path_buf();
            thread::spawn(move || {
                cli()
                    .args(args(i))
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

#[test]
fn test_concurrent_water_adds_are_all_counted() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_parallel(data_dir, 16, |_| vec!["water".into(), "add".into()]);

    let store = read_store(data_dir);
    assert_eq!(store["water_intake"], "16");

    let journal = fs::read_to_string(data_dir.join("journal/activity.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 16);
}

#[test]
fn test_concurrent_meal_adds_keep_total_in_sync() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_parallel(data_dir, 10, |i| {
        vec![
            "meal".into(),
            "add".into(),
            "snacks".into(),
            format!("Apple {}", i),
            "95".into(),
        ]
    });

    let store = read_store(data_dir);
    assert_eq!(store["calories_consumed"], "950");

    let meals: serde_json::Value =
        serde_json::from_str(store["meals_data"].as_str().unwrap()).unwrap();
    assert_eq!(meals["Snacks"].as_array().unwrap().len(), 10);
}

#[test]
fn test_mixed_concurrent_updates() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_parallel(data_dir, 12, |i| {
        if i % 2 == 0 {
            vec!["water".into(), "add".into()]
        } else {
            vec![
                "meal".into(),
                "add".into(),
                "lunch".into(),
                "Rice".into(),
                "200".into(),
            ]
        }
    });

    let store = read_store(data_dir);
    assert_eq!(store["water_intake"], "6");
    assert_eq!(store["calories_consumed"], "1200");
}
