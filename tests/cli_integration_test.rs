// Integration tests for the supplyfeed binary
// Each run points --config-file at a temp file so user configuration never leaks in

use std::fs;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn run_supplyfeed(config: &str, argv: &[&str]) -> Output {
    let config_file = NamedTempFile::new().unwrap();
    fs::write(&config_file, config).unwrap();

    Command::new(env!("CARGO_BIN_EXE_supplyfeed"))
        .arg("--config-file")
        .arg(config_file.path())
        .arg("--no-color")
        .args(argv)
        .env_remove("SUPPLYFEED_CONFIG")
        .output()
        .expect("Failed to execute supplyfeed")
}

#[test]
fn test_list_json_prints_seeded_feed() {
    let output = run_supplyfeed("", &["list", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["title"], "Low Stock Alert");
    assert_eq!(records[0]["priority"], "high");
    assert_eq!(records.iter().filter(|r| r["read"] == false).count(), 2);
}

#[test]
fn test_list_filters() {
    let output = run_supplyfeed("", &["list", "--format", "json", "--filter", "unread", "--category", "ml"]);
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["category"], "ml");
}

#[test]
fn test_list_respects_config_seed_flag() {
    let output = run_supplyfeed("[feed]\nseed = false\n", &["list", "--format", "json"]);
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(records.as_array().unwrap().is_empty());
}

#[test]
fn test_list_table_output() {
    let output = run_supplyfeed("", &["list"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("TITLE"));
    assert!(stdout.contains("New Marketplace Order"));
    assert!(stdout.contains("5 notifications, 2 unread, 1 high priority"));
}

#[test]
fn test_demo_output() {
    let output = run_supplyfeed("", &["demo", "--format", "json"]);
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[4]["title"], "Wallet Connected");
}

#[test]
fn test_watch_with_duration_exits() {
    let output = run_supplyfeed(
        "[feed]\nseed = false\n",
        &["watch", "--duration", "1s", "--interval", "100ms", "--probability", "1", "--seed", "3"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Generated"));
    assert!(stdout.contains("unread"));
}

#[test]
fn test_invalid_configuration_fails() {
    let output = run_supplyfeed("[feed]\nretention = 0\n", &["list"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_conflicting_log_flags_fail() {
    let output = run_supplyfeed("", &["--verbose", "--quiet", "list"]);
    assert_eq!(output.status.code(), Some(1));
}
