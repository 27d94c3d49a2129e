//! Basic CLI E2E tests.
//!
//! Tests run the built binary with HOME pointed at a scratch directory so the
//! config file never touches the real one.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_weatherdash-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("WEATHERDASH_ENV")
        .env_remove("WEATHERDASH_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("output line is not JSON"))
        .collect()
}

#[test]
fn test_bounds_as_of_a_fixed_instant() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(home.path(), &["bounds", "--now", "2025-01-02T12:00:00Z"]);
    assert_eq!(code, 0, "bounds failed: {stderr}");

    let bounds: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(bounds["lower"], "2024-12-03T12:00:00Z");
    assert_eq!(bounds["upper"], "2025-01-01T12:00:00Z");
}

#[test]
fn test_config_get_set_reset() {
    let home = TempDir::new().unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "interaction.debounce_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "100");
    assert!(home.path().join(".config/weatherdash/config.toml").exists());

    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "interaction.debounce_ms", "250"]);
    assert_eq!(code, 0, "config set failed: {stderr}");
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "interaction.debounce_ms"]);
    assert_eq!(stdout.trim(), "250");

    let (_, _, code) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "interaction.debounce_ms"]);
    assert_eq!(stdout.trim(), "100");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timeline.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"), "stderr: {stderr}");

    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "timeline.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key: timeline.nope"), "stderr: {stderr}");
}

#[test]
fn test_config_rejects_values_past_ceiling() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timeline.window_days", "200000000"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("timeline.window_days"), "stderr: {stderr}");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timeline.window_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_config_path_points_into_home() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with(".config/weatherdash/config.toml"), "stdout: {stdout}");
}

#[test]
fn test_config_list_is_json() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(config["weather"]["hourly_variable"], "temperature_2m");
    assert_eq!(config["timeline"]["window_days"], 30);
}

#[test]
fn test_script_replays_a_range_drag() {
    let home = TempDir::new().unwrap();
    let script = home.path().join("session.txt");
    std::fs::write(
        &script,
        "# open a range and drag both handles\n\
         mode range\n\
         press start 0\n\
         up\n\
         \n\
         press end 50\n\
         move 75\n\
         up\n\
         show\n",
    )
    .unwrap();

    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["script", script.to_str().unwrap(), "--now", "2025-01-02T12:00:00Z"],
    );
    assert_eq!(code, 0, "script failed: {stderr}");

    let events = json_lines(&stdout);
    let kinds: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        [
            "ModeChanged",
            "DragStarted",
            "DragCommitted",
            "DragStarted",
            "DraftMoved",
            "DragCommitted",
            "SelectionSnapshot",
        ]
    );

    let selection = &events[6]["selection"];
    assert_eq!(selection["mode"], "range");
    assert_eq!(selection["start"], "2024-12-03T12:00:00Z");
    assert_eq!(selection["end"], "2024-12-25T06:00:00Z");
}

#[test]
fn test_script_reports_the_failing_line() {
    let home = TempDir::new().unwrap();
    let script = home.path().join("bad.txt");
    std::fs::write(&script, "mode range\nwiggle 3\n").unwrap();

    let (stdout, stderr, code) = run_cli(home.path(), &["script", script.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("line 2"), "stderr: {stderr}");
    assert_eq!(json_lines(&stdout).len(), 1);
}
