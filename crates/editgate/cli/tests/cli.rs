//! Binary-level tests for the editgate CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SETTINGS: &str = r#"
marker_ttl_seconds = 600

[content_types]
post = "approval-required"
page = "whenever"
"#;

const WORLD: &str = r#"
approvers = [2]

[[items]]
id = 1
content_type = "post"
status = "published"
created_at = "2024-01-01T00:00:00Z"

[[revisions]]
id = 10
content = 1
author = 2
created_at = "2024-01-02T00:00:00Z"

[[pointers]]
content = 1
revision = 10

[[saves]]
content = 1
actor = 3
at = "2024-01-03T00:00:00Z"
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn editgate() -> Command {
    let mut cmd = Command::cargo_bin("editgate").unwrap();
    cmd.env_remove("EDITGATE_CONFIG")
        .env_remove("EDITGATE_FIXTURE")
        .env("RUST_LOG", "off");
    cmd
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[test]
fn check_config_lists_warnings() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "editgate.toml", SETTINGS);

    editgate()
        .args(["--config", &config, "check-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"marker_ttl_seconds\": 600"))
        .stdout(predicate::str::contains("whenever"));
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = path_str(&dir.path().join("absent.toml"));

    editgate()
        .args(["--config", &config, "check-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"marker_ttl_seconds\": 900"));
}

#[test]
fn resolve_prints_effective_mode() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "editgate.toml", SETTINGS);
    let fixture = write(&dir, "world.toml", WORLD);

    editgate()
        .args(["--config", &config, "--fixture", &fixture, "resolve", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"approval-required\""));
}

#[test]
fn simulate_files_contributor_save_as_pending() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "editgate.toml", SETTINGS);
    let fixture = write(&dir, "world.toml", WORLD);

    editgate()
        .args(["--config", &config, "--fixture", &fixture, "simulate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("just_filed_as_pending"))
        .stdout(predicate::str::contains("\"pending_count\": 1"));
}

#[test]
fn fixture_commands_require_a_fixture() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "editgate.toml", SETTINGS);

    editgate()
        .args(["--config", &config, "pending", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fixture"));
}
