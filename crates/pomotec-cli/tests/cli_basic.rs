//! Basic CLI E2E tests.
//!
//! Tests invoke the built `pomotec` binary with `HOME` pointed at a temporary
//! directory, so the real user configuration is never touched.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomotec"))
        .args(args)
        .env("HOME", home)
        .env_remove("POMOTEC_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_config_path_lives_under_home() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0, "config path failed");

    let expected = home.path().join(".config").join("pomotec").join("config.toml");
    assert_eq!(stdout.trim(), expected.display().to_string());
}

#[test]
fn test_config_get_defaults() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "durations.focus_minutes"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "25");

    // The first load writes the default file.
    assert!(home.path().join(".config/pomotec/config.toml").exists());
}

#[test]
fn test_config_set_persists() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "set", "durations.break_minutes", "10"]);
    assert_eq!(code, 0, "config set failed");
    assert_eq!(stdout.trim(), "ok");

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "durations.break_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_config_list_json() {
    let home = TempDir::new().unwrap();
    let _ = run_cli(home.path(), &["config", "set", "notifications.enabled", "false"]);
    let (code, stdout, _) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0, "config list failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["notifications"]["enabled"], false);
    assert_eq!(parsed["durations"]["focus_minutes"], 25);
}

#[test]
fn test_config_rejects_bad_input() {
    let home = TempDir::new().unwrap();

    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "durations.focus_minutes", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "unexpected stderr: {stderr}");

    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "durations.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"), "unexpected stderr: {stderr}");

    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "durations.focus_minutes"]);
    assert_eq!(stdout.trim(), "25");
}
