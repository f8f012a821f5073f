//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_islearn"))
        .args(args)
        .env("ISLEARN_DATA_DIR", data_dir)
        .env_remove("ISLEARN_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("event line is JSON"))
        .collect()
}

fn no_delay(dir: &Path) {
    let (_, _, code) = run_cli(dir, &["config", "set", "game.feedback_delay_ms", "0"]);
    assert_eq!(code, 0);
}

#[test]
fn test_profile_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["profile", "show"]);
    assert_eq!(code, 0);
    let profile: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(profile["userId"], "local");
    assert_eq!(profile["currentLevel"], 1);
}

#[test]
fn test_login_persists_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["profile", "login", "u1", "--name", "Asha"]);
    assert_eq!(code, 0);

    let (_, _, code) = run_cli(dir.path(), &["progress", "complete", "1"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(dir.path(), &["profile", "show"]);
    assert_eq!(code, 0);
    let profile: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(profile["userId"], "u1");
    assert_eq!(profile["name"], "Asha");
    assert_eq!(profile["completedSigns"], serde_json::json!(["1"]));
    assert_eq!(profile["rewardsEarned"], serde_json::json!(["1"]));
}

#[test]
fn test_complete_level_advances() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["progress", "complete", "1"]);
    run_cli(dir.path(), &["progress", "complete", "2"]);
    let (stdout, _, code) = run_cli(dir.path(), &["progress", "complete", "3"]);
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert!(events.iter().any(|e| e["type"] == "LevelAdvanced" && e["to_level"] == 2));

    let (stdout, _, _) = run_cli(dir.path(), &["progress", "status"]);
    let status: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["currentLevel"], 2);
}

#[test]
fn test_unknown_sign_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["progress", "complete", "zzz"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown sign: zzz"));
}

#[test]
fn test_level_and_library() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["level", "list"]);
    assert_eq!(code, 0);
    let levels: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(levels.as_array().unwrap().len(), 2);

    let (_, _, code) = run_cli(dir.path(), &["level", "show", "9"]);
    assert_eq!(code, 1);

    let (stdout, _, code) = run_cli(dir.path(), &["library", "videos"]);
    assert_eq!(code, 0);
    let videos: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(videos.as_array().unwrap().len(), 2);

    let (stdout, _, code) = run_cli(dir.path(), &["library", "media", "4"]);
    assert_eq!(code, 0);
    let media: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(media["description"], "Sign Hello");
}

#[test]
fn test_practice_run_records_score() {
    let dir = tempfile::tempdir().unwrap();
    no_delay(dir.path());

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["practice", "run", "--results", "1,0,1", "--record"],
    );
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(events[0]["type"], "GameStarted");
    assert!(events
        .iter()
        .any(|e| e["type"] == "GameFinished" && e["score"] == 20));
    assert!(events
        .iter()
        .any(|e| e["type"] == "ScoreRecorded" && e["total_score"] == 20));

    let (stdout, _, _) = run_cli(dir.path(), &["progress", "status"]);
    let status: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["totalScore"], 20);
    assert_eq!(status["completedSigns"], serde_json::json!(["1", "3"]));
}

#[test]
fn test_practice_rejects_bad_confidence() {
    let dir = tempfile::tempdir().unwrap();
    no_delay(dir.path());
    let (_, stderr, code) = run_cli(dir.path(), &["practice", "run", "--confidence", "1.5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Confidence must be within [0, 1]"));
}

#[test]
fn test_config_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    no_delay(dir.path());
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "game.feedback_delay_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "game.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key: game.nope"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "game.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key: game.nope"));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "ui.dark_mode", "true"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ui.dark_mode = true");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(Path::new(stdout.trim()).starts_with(dir.path()));

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "game.feedback_delay_ms"]);
    assert_eq!(stdout.trim(), "1500");
}
