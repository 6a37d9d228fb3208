// CLI contract tests for the jot binary
//
// Everything here fails or exits before the interactive view starts, so no
// terminal is needed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config and environment
fn jot(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jot"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("JOT_JOURNAL_DIR")
        .env_remove("JOT_WATCH_ENABLED")
        .env_remove("JOT_WATCH_DEBOUNCE_MS")
        .env_remove("JOT_CACHE_EVENT_CAPACITY")
        .env_remove("JOT_UI_TICK_MS");
    cmd
}

// ━━━ Test 1: help lists the flags ━━━
#[test]
fn help_lists_flags() {
    let home = TempDir::new().unwrap();
    jot(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--journal-dir"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--no-watch"));
}

// ━━━ Test 2: unknown flags are usage errors ━━━
#[test]
fn unknown_flag_is_rejected() {
    let home = TempDir::new().unwrap();
    jot(&home)
        .arg("--bogus")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--bogus"));
}

// ━━━ Test 3: invalid config values stop startup ━━━
#[test]
fn invalid_config_reports_cause_and_exit_code() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("jot.toml");
    fs::write(&config, "[watch]\ndebounce_ms = 1\n").unwrap();

    jot(&home)
        .arg("--config")
        .arg(&config)
        .arg("--journal-dir")
        .arg(home.path().join("journal"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"))
        .stderr(predicate::str::contains("debounce_ms must be 10-5000"));

    assert!(!home.path().join("journal").exists());
}

// ━━━ Test 4: malformed TOML is a parse error ━━━
#[test]
fn malformed_config_is_a_parse_error() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("jot.toml");
    fs::write(&config, "[watch\n").unwrap();

    jot(&home)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid TOML syntax"));
}
