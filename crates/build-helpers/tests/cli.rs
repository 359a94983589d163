//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use chrono::Datelike;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn short_version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd()
        .arg("info")
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout)
        .expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn info_json_contains_expected_fields() {
    cmd()
        .arg("info")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\""))
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn info_help_shows_command_options() {
    cmd()
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn info_json_reports_banner_defaults() {
    let tmp = TempDir::new().unwrap();
    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    assert_eq!(json["banner"]["npm"], false);
    assert_eq!(json["banner"]["fault_tolerant"], true);
    assert!(
        json["banner"]["package_file"]
            .as_str()
            .unwrap()
            .ends_with("package.json")
    );
}

// =============================================================================
// Banner Command
// =============================================================================

const PACKAGE_JSON: &str = r#"{
  "author": "Kim Doe <kim@example.com>",
  "license": "MIT",
  "name": "my-lib",
  "version": "1.2.3",
  "description": "ignored"
}"#;

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("package.json"), PACKAGE_JSON).unwrap();
    tmp
}

#[test]
fn banner_without_history_shows_current_year() {
    let tmp = project();
    let expected = format!(
        "/**\n * my-lib\n * @version 1.2.3\n * @license Copyright (c) {} Kim Doe <kim@example.com>\n * SPDX-License-Identifier: MIT\n */\n",
        current_year()
    );

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "banner", "--no-history"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn banner_with_pinned_year_shows_range() {
    let tmp = project();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "banner",
            "--npm",
            "--first-commit-year",
            "2001",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            " * https://www.npmjs.com/package/my-lib\n",
        ))
        .stdout(predicate::str::contains(format!(
            " * @license Copyright (c) 2001 - {} Kim Doe",
            current_year()
        )));
}

#[test]
fn banner_outside_git_is_fault_tolerant() {
    let tmp = project();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "banner"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Copyright (c) {} Kim Doe",
            current_year()
        )));
}

#[test]
fn banner_json_reports_inputs() {
    let tmp = project();
    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--json",
            "banner",
            "--first-commit-year",
            "2010",
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    assert_eq!(json["first_commit_year"], 2010);
    assert!(json["banner"].as_str().unwrap().starts_with("/**\n * my-lib"));
}

#[test]
fn banner_custom_package_file() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("lib")).unwrap();
    fs::write(tmp.path().join("lib").join("meta.json"), PACKAGE_JSON).unwrap();

    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "banner",
            "--no-history",
            "--package",
            "lib/meta.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(" * my-lib\n"));
}

#[test]
fn banner_missing_package_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "banner", "--no-history"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn banner_malformed_package_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("package.json"), "{not json").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "banner", "--no-history"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse packageJson"));
}

#[test]
fn banner_wrong_field_type_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("package.json"),
        r#"{"author":"A","license":"MIT","name":"x","version":3}"#,
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "banner", "--no-history"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "packageJson version is type 'number' not 'string'",
        ));
}

// =============================================================================
// First Commit Year Command
// =============================================================================

#[test]
fn first_commit_year_outside_git_prints_zero() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "first-commit-year"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn first_commit_year_strict_outside_git_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "first-commit-year",
            "--strict",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to determine first commit year"));
}

#[test]
fn first_commit_year_json() {
    let tmp = TempDir::new().unwrap();
    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "first-commit-year"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    assert_eq!(json["year"], 0);
}

// =============================================================================
// Bundle Config Command
// =============================================================================

#[test]
fn bundle_config_without_banner() {
    cmd()
        .args(["bundle-config", "dist/out.js", "--no-banner"])
        .assert()
        .success()
        .stdout(
            r#"{
  "input": "src/index.js",
  "output": {
    "file": "dist/out.js",
    "format": "es"
  }
}
"#,
        );
}

#[test]
fn bundle_config_embeds_banner() {
    let tmp = project();
    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "bundle-config",
            "dist/my-lib.js",
            "--no-history",
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    assert_eq!(json["input"], "src/index.js");
    assert_eq!(json["output"]["file"], "dist/my-lib.js");
    assert_eq!(json["output"]["format"], "es");
    let banner = json["output"]["banner"].as_str().unwrap();
    assert!(banner.starts_with("/**\n * my-lib\n"));
    assert!(banner.ends_with(" */"));
}

#[test]
fn bundle_config_empty_output_file_fails() {
    cmd()
        .args(["bundle-config", "", "--no-banner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("output file is an empty string"));
}

#[test]
fn bundle_config_requires_output_file() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "bundle-config", "--no-banner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no output file given"));
}

#[test]
fn bundle_config_no_banner_conflicts_with_banner_flags() {
    cmd()
        .args(["bundle-config", "out.js", "--no-banner", "--npm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// =============================================================================
// Doctor Command
// =============================================================================

#[test]
fn doctor_json_reports_checks() {
    let tmp = project();
    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "doctor"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).expect("valid JSON");
    let checks = json["checks"].as_array().unwrap();
    let package = checks.iter().find(|c| c["name"] == "package").unwrap();
    assert_eq!(package["passed"], true);
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd()
        .args(["--quiet", "info"])
        .assert()
        .success();
}

#[test]
fn short_quiet_flag_accepted() {
    cmd()
        .args(["-q", "info"])
        .assert()
        .success();
}

#[test]
fn verbose_flag_accepted() {
    cmd()
        .args(["--verbose", "info"])
        .assert()
        .success();
}

#[test]
fn short_verbose_flag_accepted() {
    cmd()
        .args(["-v", "info"])
        .assert()
        .success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd()
        .args(["-vv", "info"])
        .assert()
        .success();
}

#[test]
fn color_auto_accepted() {
    cmd()
        .args(["--color", "auto", "info"])
        .assert()
        .success();
}

#[test]
fn color_always_accepted() {
    cmd()
        .args(["--color", "always", "info"])
        .assert()
        .success();
}

#[test]
fn color_never_accepted() {
    cmd()
        .args(["--color", "never", "info"])
        .assert()
        .success();
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Chdir Flag
// =============================================================================

#[test]
fn chdir_flag_changes_directory() {
    // The -C flag should be accepted and work without error
    // We use a path that definitely exists
    cmd()
        .args(["-C", "/tmp", "info"])
        .assert()
        .success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}
