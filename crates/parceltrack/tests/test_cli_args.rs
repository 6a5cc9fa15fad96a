//! CLI argument parsing tests for Parceltrack

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    let env = TestEnv::default();
    let mut cmd = env.command();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Parcel tracking store"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--version"));
}

#[test]
fn test_version_flag() {
    let env = TestEnv::default();
    let mut cmd = env.command();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_no_args_shows_help() {
    let env = TestEnv::default();
    let mut cmd = env.command();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_command() {
    let env = TestEnv::default();
    let mut cmd = env.command();
    cmd.arg("teleport");
    cmd.assert().failure();
}

// ============================================================================
// Subcommand help
// ============================================================================

#[test]
fn test_all_commands_have_help() {
    let env = TestEnv::default();
    for command in ["init", "status", "demo", "simulate", "routes", "tools"] {
        let mut cmd = env.command();
        cmd.args([command, "--help"]);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

#[test]
fn test_simulate_help_lists_options() {
    let env = TestEnv::default();
    let mut cmd = env.command();
    cmd.args(["simulate", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("-c, --couriers"))
        .stdout(predicate::str::contains("-p, --parcels"));
}

#[test]
fn test_routes_requires_endpoints() {
    let env = TestEnv::default();
    let mut cmd = env.command();
    cmd.args(["routes", "--from", "Casablanca"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}

#[test]
fn test_simulate_rejects_non_numeric() {
    let env = TestEnv::default();
    let mut cmd = env.command();
    cmd.args(["simulate", "--couriers", "many"]);
    cmd.assert().failure();
}
