//! End-to-end tests for the CLI binary
//!
//! Every run uses `--offline`, so results come from the geometric estimator
//! and no network access is needed.

use std::io::Write;
use std::process::{Command, Output};

use serde_json::Value;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_waypoint-cli"))
        .arg("--offline")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn leg_prints_fallback_segment() {
    let output = run(&[
        "leg",
        "--from",
        "52.52,13.405",
        "--to",
        "48.1351,11.582",
    ]);
    let segment = stdout_json(&output);

    assert_eq!(segment["mode"], "DRIVING");
    assert_eq!(segment["source"], "fallback");
    assert_eq!(segment["duration_minutes"], 471);
}

#[test]
fn leg_honors_mode() {
    let output = run(&[
        "leg",
        "--from",
        "0,0",
        "--to",
        "0,0.01",
        "--mode",
        "walking",
    ]);
    let segment = stdout_json(&output);

    assert_eq!(segment["mode"], "WALKING");
    assert_eq!(segment["duration_minutes"], 18);
}

#[test]
fn trip_prints_segments_and_totals() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": "a", "name": "Berlin", "location": {{"latitude": 52.52, "longitude": 13.405}}}},
            {{"id": "x", "name": "Somewhere"}},
            {{"id": "b", "name": "Munich", "location": {{"latitude": 48.1351, "longitude": 11.582}},
              "arrival_transport": {{"mode": "DRIVING"}}}}
        ]"#
    )
    .unwrap();

    let output = run(&["trip", file.path().to_str().unwrap()]);
    let trip = stdout_json(&output);

    let segments = trip["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0]["origin"]["id"], "a");
    assert_eq!(segments[0]["destination"]["id"], "b");
    assert_eq!(trip["totals"]["DRIVING"]["duration_minutes"], 471);
    assert_eq!(trip["totals"]["WALKING"]["duration_minutes"], 0);
}

#[test]
fn trip_with_missing_file_fails() {
    let output = run(&["trip", "/nonexistent/stops.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

#[test]
fn invalid_coordinates_are_rejected() {
    let output = run(&["leg", "--from", "95,0", "--to", "0,0"]);
    assert!(!output.status.success());
}

#[test]
fn verbosity_flag_beats_rust_log() {
    let leg = ["leg", "--from", "52.52,13.405", "--to", "52.40,13.05"];
    let with_env = |extra: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_waypoint-cli"))
            .arg("--offline")
            .args(extra)
            .args(leg)
            .env("RUST_LOG", "warn")
            .output()
            .unwrap()
    };

    let quiet = with_env(&[]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("DEBUG"));

    let verbose = with_env(&["-vv"]);
    assert!(verbose.status.success());
    assert!(String::from_utf8_lossy(&verbose.stderr).contains("DEBUG"));
}
