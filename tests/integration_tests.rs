//! Integration tests for the travel-planner CLI

use std::process::Command;

fn planner_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_travel-planner"));
    command.env_remove("OPENROUTER_API_KEY").env_remove("RUST_LOG");
    command
}

/// Test that the CLI shows help with explicit help flag
#[test]
fn test_cli_help() {
    let output = planner_command()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("travel-planner"));
    assert!(stdout.contains("--start"));
    assert!(stdout.contains("--arrival"));
}

/// Test that required dates are enforced by argument parsing
#[test]
fn test_missing_dates_is_usage_error() {
    let output = planner_command()
        .arg("Paris")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--start"));
}

/// Test that malformed dates are rejected before any network access
#[test]
fn test_invalid_date_format() {
    let output = planner_command()
        .args(["Paris", "--start", "01/06/2024", "--end", "2024-06-03"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("YYYY-MM-DD"));
}

/// Test error handling for a reversed date range
#[test]
fn test_reversed_dates_error() {
    let output = planner_command()
        .args(["Paris", "--start", "2024-06-05", "--end", "2024-06-01"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid input"));
}

/// Test that an explicit but missing config file is reported
#[test]
fn test_missing_config_file() {
    let output = planner_command()
        .args([
            "Paris",
            "--start",
            "2024-06-01",
            "--end",
            "2024-06-03",
            "--config",
            "does/not/exist.toml",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"));
}
