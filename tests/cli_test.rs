//! Integration tests for CLI argument parsing.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn autovenv() -> Command {
    let mut cmd = Command::new(cargo_bin("autovenv"));
    cmd.env_remove("AUTOVENV_VENV");
    cmd
}

/// End-to-end tests build a real virtualenv; skip them where no Python is
/// installed.
fn python3_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = autovenv();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("auto-managed virtualenv"));
    Ok(())
}

#[test]
fn cli_help_lists_python_passthrough_flags() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = autovenv();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("-c"))
        .stdout(predicate::str::contains("-m"))
        .stdout(predicate::str::contains("--system-site-packages"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = autovenv();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_missing_script_fails_before_any_env_work() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = autovenv();
    cmd.current_dir(temp.path());
    cmd.arg("does-not-exist.py");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Script not found"));
    // The failed run must not have left a half-made environment behind.
    assert!(!temp.path().join("venv").exists());
    Ok(())
}

#[test]
fn cli_rejects_command_and_module_together() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = autovenv();
    cmd.args(["-c", "print()", "-m", "json.tool"]);
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_rejects_color_and_no_color_together() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = autovenv();
    cmd.args(["--color", "--no-color"]);
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_rejects_unknown_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = autovenv();
    cmd.arg("--definitely-not-a-flag");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_broken_venv_dir_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let script = temp.path().join("app.py");
    std::fs::write(&script, "print('hi')\n")?;
    // A directory that was never populated by venv creation. Running
    // against it must fail rather than fall back to the system Python.
    std::fs::create_dir(temp.path().join("venv"))?;

    let mut cmd = autovenv();
    cmd.current_dir(temp.path());
    cmd.args(["--no-venv", "--venv", "venv", "app.py"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No virtual environment"));
    Ok(())
}

#[test]
fn cli_run_creates_venv_and_writes_requirements() -> Result<(), Box<dyn std::error::Error>> {
    if !python3_available() {
        return Ok(());
    }
    let temp = TempDir::new()?;
    let script = temp.path().join("app.py");
    std::fs::write(&script, "print('from inside')\n")?;

    let mut cmd = autovenv();
    cmd.current_dir(temp.path());
    cmd.args(["--venv", "venv", "app.py"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("from inside"));

    assert!(temp.path().join("venv").join("pyvenv.cfg").exists());
    assert!(temp.path().join("requirements.txt").exists());
    Ok(())
}

#[test]
fn cli_no_requirements_skips_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    if !python3_available() {
        return Ok(());
    }
    let temp = TempDir::new()?;
    let script = temp.path().join("app.py");
    std::fs::write(&script, "print('ok')\n")?;

    let mut cmd = autovenv();
    cmd.current_dir(temp.path());
    cmd.args(["--venv", "venv", "--no-requirements", "app.py"]);
    cmd.assert().success();

    assert!(temp.path().join("venv").exists());
    assert!(!temp.path().join("requirements.txt").exists());
    Ok(())
}

#[test]
fn cli_runs_script_with_stdlib_import() -> Result<(), Box<dyn std::error::Error>> {
    if !python3_available() {
        return Ok(());
    }
    let temp = TempDir::new()?;
    let script = temp.path().join("app.py");
    // An already-importable name must run untouched, with no install.
    std::fs::write(&script, "import json\nprint(json.dumps([1, 2]))\n")?;

    let mut cmd = autovenv();
    cmd.current_dir(temp.path());
    cmd.args(["--venv", "venv", "app.py"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[1, 2]"))
        .stdout(predicate::str::contains("installing").not());
    Ok(())
}

#[test]
fn cli_venv_creation_failure_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let script = temp.path().join("app.py");
    std::fs::write(&script, "print('hi')\n")?;

    // A bogus builder interpreter makes environment creation fail before
    // any activation or user code.
    let mut cmd = autovenv();
    cmd.current_dir(temp.path());
    cmd.args(["--venv", "env", "--python", "/no/such/python", "app.py"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create virtual environment"));
    Ok(())
}
