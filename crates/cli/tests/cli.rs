//! End-to-end tests driving the s3menu binary through stdin.
//!
//! None of these choose a storage action, so no S3 endpoint is contacted.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Write a config that pins region and endpoint so the SDK never probes
fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        r#"
[storage]
region = "us-east-1"
endpoint = "http://127.0.0.1:9"
force_path_style = true

[menu]
app_name = "Test Drive"
"#,
    )
    .unwrap();
    path
}

fn s3menu(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("s3menu").unwrap();
    cmd.env("HOME", home.path())
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .env("AWS_ACCESS_KEY_ID", "test")
        .env("AWS_SECRET_ACCESS_KEY", "test")
        .env_remove("RUST_LOG")
        .env_remove("S3MENU_CONFIG");
    cmd
}

#[test]
fn test_quit_from_main_menu() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path());

    s3menu(&home)
        .arg("--config")
        .arg(&config)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to the  Test Drive Application"))
        .stdout(predicate::str::contains("a. Create a bucket"))
        .stdout(predicate::str::contains("Thanks for trying the Test Drive Application."));
}

#[test]
fn test_invalid_choice_then_exit() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path());

    s3menu(&home)
        .env("S3MENU_CONFIG", &config)
        .write_stdin("z\nEXIT\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice. Please try again.").count(2));
}

#[test]
fn test_closed_stdin_exits_cleanly() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path());

    s3menu(&home)
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("What would you like to do?"));
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();

    s3menu(&home)
        .arg("--config")
        .arg(home.path().join("nope.toml"))
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();

    s3menu(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
