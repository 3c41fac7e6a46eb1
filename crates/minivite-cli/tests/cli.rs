//! Integration tests for the `minivite` binary.

use std::process::Command;
use tempfile::tempdir;

fn minivite() -> Command {
    Command::new(env!("CARGO_BIN_EXE_minivite"))
}

#[test]
fn test_version_prints_name_and_version() {
    let output = minivite().arg("version").output().expect("failed to run minivite");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("minivite "), "unexpected output: {stdout}");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_dev_with_missing_root_fails() {
    let dir = tempdir().unwrap();

    let output = minivite()
        .args(["dev", "--port", "0", "--root"])
        .arg(dir.path().join("does-not-exist"))
        .output()
        .expect("failed to run minivite");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Project root not found"), "unexpected stderr: {stderr}");
}

#[test]
fn test_dev_with_bad_config_fails() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("minivite.config.json"), r#"{"port": "not a number"}"#).unwrap();

    let output = minivite()
        .args(["dev", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("failed to run minivite");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config"), "unexpected stderr: {stderr}");
}
