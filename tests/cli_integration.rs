//! Testes de integração para a CLI do valcache.

use std::process::Command;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::TempDir;

fn valcache_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_valcache"))
}

#[test]
fn test_version_command() {
    let output = valcache_bin()
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valcache"));
}

#[test]
fn test_help_command() {
    let output = valcache_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_init_creates_config() {
    use std::fs;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("valcache.toml");

    let output = valcache_bin()
        .arg("init")
        .arg("--path")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "init command failed");
    assert!(config_path.exists(), "Config file was not created");

    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[general]"));
    assert!(content.contains("[cache]"));
    assert!(content.contains("max = 1000"));
}

#[test]
fn test_invalid_command() {
    let output = valcache_bin()
        .arg("invalid-command-that-does-not-exist")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_verbose_and_quiet_flags() {
    for flag in ["-v", "-q"] {
        let output = valcache_bin()
            .arg(flag)
            .arg("version")
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success(), "{} failed", flag);
    }
}

#[test]
fn test_check_from_stdin_reports_cache_hits() {
    AssertCommand::cargo_bin("valcache")
        .expect("binary exists")
        .args(["check", "--pattern", "abc"])
        .write_stdin("\"xabcd\"\n\"xabcd\"\n\"xabcd\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 inputs: 3 passed, 0 failed"))
        .stdout(predicate::str::contains("pipeline runs: 1"))
        .stdout(predicate::str::contains("2 hits, 1 misses"));
}

#[test]
fn test_check_no_cache_runs_pipeline_every_time() {
    AssertCommand::cargo_bin("valcache")
        .expect("binary exists")
        .args(["check", "--pattern", "abc", "--no-cache"])
        .write_stdin("\"xabcd\"\n\"xabcd\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("pipeline runs: 2"));
}

#[test]
fn test_check_failure_sets_exit_code() {
    AssertCommand::cargo_bin("valcache")
        .expect("binary exists")
        .args(["check", "--pattern", "abc"])
        .write_stdin("\"xbcd\"\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("string.pattern"));
}

#[test]
fn test_check_rejects_invalid_max() {
    AssertCommand::cargo_bin("valcache")
        .expect("binary exists")
        .args(["check", "--max", "-1"])
        .write_stdin("\"x\"\n")
        .assert()
        .failure();
}

#[test]
fn test_config_file_sets_capacity() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("custom.toml");
    std::fs::write(&config_path, "[cache]\nmax = 1\n").expect("Failed to write config");

    AssertCommand::cargo_bin("valcache")
        .expect("binary exists")
        .arg("--config")
        .arg(&config_path)
        .args(["check"])
        .write_stdin("\"a\"\n\"b\"\n\"a\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("cache: 1/1 entries"))
        .stdout(predicate::str::contains("pipeline runs: 3"));
}

#[test]
fn test_config_command_prints_effective_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    AssertCommand::cargo_bin("valcache")
        .expect("binary exists")
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("log_level = \"info\""))
        .stdout(predicate::str::contains("max = 1000"));
}
