//! End-to-end tests for the timeline flow.
//!
//! Drives the `fl` binary with events read from files, so no activity
//! service is needed: file → aggregate → timeline/summary/events output.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

fn fl_binary() -> String {
    env!("CARGO_BIN_EXE_fl").to_string()
}

/// Runs `fl` with an isolated home so no user config leaks in.
fn run_fl(home: &Path, args: &[&str]) -> Output {
    Command::new(fl_binary())
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("FL_SERVER_URL")
        .env_remove("FL_BUCKET")
        .env_remove("FL_BUCKET_PREFIX")
        .args(args)
        .output()
        .expect("failed to run fl")
}

fn sample_events() -> Value {
    json!([
        {"timestamp": "2025-01-15T10:00:00Z", "duration": 120, "data": {"app": "code.exe", "title": "Project"}},
        {"timestamp": "2025-01-15T10:02:01Z", "duration": 5, "data": {"app": "ShellExperienceHost.exe", "title": ""}},
        {"timestamp": "2025-01-15T10:02:07Z", "duration": 60, "data": {"app": "code.exe", "title": "Project"}},
        {"timestamp": "2025-01-15T10:03:10Z", "duration": 4, "data": {"app": "explorer.exe", "title": ""}},
        {"timestamp": "2025-01-15T10:03:25Z", "duration": 300, "data": {"app": "chrome.exe", "title": "StackOverflow"}},
        {"timestamp": "2025-01-15T10:08:30Z", "duration": 200, "data": {"app": "code.exe", "title": ""}},
        {"timestamp": "2025-01-15T10:20:00Z", "duration": 8, "data": {"app": "slack.exe", "title": "general"}}
    ])
}

fn write_events(dir: &Path, events: &Value) -> String {
    let path = dir.join("events.json");
    std::fs::write(&path, events.to_string()).unwrap();
    path.display().to_string()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "fl should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_timeline_json_from_file() {
    let temp = TempDir::new().unwrap();
    let file = write_events(temp.path(), &sample_events());

    let output = run_fl(temp.path(), &["timeline", "--file", &file, "--json"]);
    let blocks = stdout_json(&output);
    let blocks = blocks.as_array().unwrap();

    // Code (merged + absorbed explorer), Browsing, Code; slack pruned.
    let summary: Vec<(String, f64)> = blocks
        .iter()
        .map(|b| {
            (
                b["category"].as_str().unwrap().to_string(),
                b["duration"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Code".to_string(), 194.0),
            ("Browsing".to_string(), 300.0),
            ("Code".to_string(), 200.0),
        ]
    );
    assert_eq!(blocks[0]["apps"], json!(["Visual Studio Code"]));
    assert_eq!(blocks[0]["end"], "2025-01-15T10:03:14Z");
    assert_eq!(blocks[1]["primary_app"], "Google Chrome");
}

#[test]
fn test_timeline_is_order_independent() {
    let temp = TempDir::new().unwrap();
    let forward = write_events(temp.path(), &sample_events());
    let forward_out = run_fl(temp.path(), &["timeline", "--file", &forward, "--json"]);

    let mut reversed = sample_events();
    reversed.as_array_mut().unwrap().reverse();
    let reversed_path = temp.path().join("reversed.json");
    std::fs::write(&reversed_path, reversed.to_string()).unwrap();
    let reversed_out = run_fl(
        temp.path(),
        &["timeline", "--file", reversed_path.to_str().unwrap(), "--json"],
    );

    assert_eq!(stdout_json(&forward_out), stdout_json(&reversed_out));
}

#[test]
fn test_timeline_only_noise_is_empty() {
    let temp = TempDir::new().unwrap();
    let file = write_events(
        temp.path(),
        &json!([
            {"timestamp": "2025-01-15T10:00:00Z", "duration": 5, "data": {"app": "ShellExperienceHost.exe", "title": ""}}
        ]),
    );

    let output = run_fl(temp.path(), &["timeline", "--file", &file, "--json"]);
    assert_eq!(stdout_json(&output), json!([]));

    let human = run_fl(temp.path(), &["timeline", "--file", &file]);
    assert!(human.status.success());
    assert_eq!(String::from_utf8_lossy(&human.stdout), "No activity blocks.\n");
}

#[test]
fn test_timeline_reads_stdin() {
    let temp = TempDir::new().unwrap();
    let mut child = Command::new(fl_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .args(["timeline", "--file", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(sample_events().to_string().as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let blocks = stdout_json(&output);
    assert_eq!(blocks.as_array().unwrap().len(), 3);
}

#[test]
fn test_file_narrowed_by_explicit_range() {
    let temp = TempDir::new().unwrap();
    let file = write_events(temp.path(), &sample_events());

    let output = run_fl(
        temp.path(),
        &[
            "timeline",
            "--file",
            &file,
            "--start",
            "2025-01-15T10:03:00Z",
            "--end",
            "2025-01-15T10:08:00Z",
            "--json",
        ],
    );
    let blocks = stdout_json(&output);
    let blocks = blocks.as_array().unwrap();

    // Only the explorer micro-event and the chrome event start in range.
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["category"], "Browsing");
}

#[test]
fn test_summary_json_from_file() {
    let temp = TempDir::new().unwrap();
    let file = write_events(temp.path(), &sample_events());

    let output = run_fl(temp.path(), &["summary", "--file", &file, "--json"]);
    let summary = stdout_json(&output);

    assert_eq!(summary["block_count"], 3);
    assert_eq!(summary["total_seconds"], 697.0);
    assert_eq!(summary["categories"][0]["category"], "Code");
    assert_eq!(summary["categories"][0]["seconds"], 394.0);
    assert_eq!(summary["apps"][0]["app"], "Visual Studio Code");
    assert_eq!(summary["apps"][0]["seconds"], 380.0);
}

#[test]
fn test_summary_averages_over_explicit_range() {
    let temp = TempDir::new().unwrap();
    let file = write_events(temp.path(), &sample_events());

    let output = run_fl(
        temp.path(),
        &[
            "summary",
            "--file",
            &file,
            "--start",
            "2025-01-13T00:00:00Z",
            "--end",
            "2025-01-20T00:00:00Z",
            "--json",
        ],
    );
    let summary = stdout_json(&output);

    assert_eq!(summary["days"], 7);
    assert_eq!(summary["total_seconds"], 697.0);
    let average = summary["daily_average"].as_f64().unwrap();
    assert!((average - 697.0 / 7.0).abs() < 1e-9);
}

#[test]
fn test_huge_duration_does_not_crash() {
    let temp = TempDir::new().unwrap();
    let file = write_events(
        temp.path(),
        &json!([
            {"timestamp": "2025-01-15T10:00:00Z", "duration": 1e15, "data": {"app": "code.exe", "title": ""}},
            {"timestamp": "2025-01-15T10:00:05Z", "duration": 60, "data": {"app": "code.exe", "title": ""}}
        ]),
    );

    let output = run_fl(temp.path(), &["timeline", "--file", &file, "--json"]);
    let blocks = stdout_json(&output);

    assert_eq!(blocks.as_array().unwrap().len(), 1);
    assert_eq!(blocks[0]["end"], "2025-01-15T10:01:05Z");
}

#[test]
fn test_events_roundtrip_through_jsonl() {
    let temp = TempDir::new().unwrap();
    let file = write_events(temp.path(), &sample_events());

    let dumped = run_fl(temp.path(), &["events", "--file", &file]);
    assert!(dumped.status.success());
    let jsonl = String::from_utf8(dumped.stdout).unwrap();
    assert_eq!(jsonl.lines().count(), 7);

    let jsonl_path = temp.path().join("events.jsonl");
    std::fs::write(&jsonl_path, &jsonl).unwrap();
    let from_jsonl = run_fl(
        temp.path(),
        &["timeline", "--file", jsonl_path.to_str().unwrap(), "--json"],
    );
    let from_json = run_fl(temp.path(), &["timeline", "--file", &file, "--json"]);

    assert_eq!(stdout_json(&from_jsonl), stdout_json(&from_json));
}

#[test]
fn test_missing_file_fails_with_context() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.json");

    let output = run_fl(
        temp.path(),
        &["timeline", "--file", missing.to_str().unwrap()],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open"), "stderr: {stderr}");
}

#[test]
fn test_conflicting_periods_rejected() {
    let temp = TempDir::new().unwrap();
    let output = run_fl(temp.path(), &["timeline", "--day", "--week"]);
    assert!(!output.status.success());
}
