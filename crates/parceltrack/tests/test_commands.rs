//! Command execution tests for Parceltrack

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// Init and status
// ============================================================================

#[test]
fn test_init_creates_config() {
    let env = TestEnv::default();

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initializing Parceltrack"))
        .stdout(predicate::str::contains("Carrier:  CTM"));

    let content = std::fs::read_to_string(env.config_file()).unwrap();
    let config: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(config["network"]["carrier"], "CTM");
    assert_eq!(config["network"]["routes"].as_array().unwrap().len(), 4);
    assert_eq!(
        config["tracking"]["not_found_message"],
        "No tracking information available"
    );
}

#[test]
fn test_init_keeps_existing_config() {
    let env = TestEnv::default();
    env.write_config(r#"{"network": {"carrier": "Supratours", "routes": []}}"#)
        .unwrap();

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Carrier:  Supratours"));

    let content = std::fs::read_to_string(env.config_file()).unwrap();
    assert!(content.contains("Supratours"));
}

#[test]
fn test_status_without_config() {
    let env = TestEnv::default();

    env.command()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Missing]"))
        .stdout(predicate::str::contains("Carrier:   CTM"));
}

#[test]
fn test_status_after_init() {
    let env = TestEnv::default();
    env.command().arg("init").assert().success();

    env.command()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK]"))
        .stdout(predicate::str::contains("Escalate:  city_ops"));
}

#[test]
fn test_corrupted_config_fails() {
    let env = TestEnv::default();
    env.write_config("{ not json").unwrap();

    env.command().arg("status").assert().failure().code(1);
}

// ============================================================================
// Demo
// ============================================================================

#[test]
fn test_demo_walkthrough() {
    let env = TestEnv::default();

    env.command()
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("PKG_123 -> picked_up at Casablanca Depot (#1)"))
        .stdout(predicate::str::contains("\"current_status\": \"in_transit\""))
        .stdout(predicate::str::contains("Booking CTM_PKG_001: confirmed (80 MAD)"))
        .stdout(predicate::str::contains("[notice] Parcel PKG_123 delivered at Rabat Agdal"))
        .stdout(predicate::str::contains("Your parcel PKG_123 is currently delivered"))
        .stdout(predicate::str::contains("Tracking history (3 events)"))
        .stdout(predicate::str::contains(
            "Sorry, I couldn't find parcel NONEXISTENT. No tracking information available.",
        ))
        .stdout(predicate::str::contains("Escalated to city_ops as TICKET_"));
}

#[test]
fn test_demo_uses_configured_message() {
    let env = TestEnv::default();
    env.write_config(r#"{"tracking": {"not_found_message": "Unknown parcel"}}"#)
        .unwrap();

    env.command()
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Sorry, I couldn't find parcel NONEXISTENT. Unknown parcel.",
        ));
}

// ============================================================================
// Simulate
// ============================================================================

#[test]
fn test_simulate_delivers_every_parcel() {
    let env = TestEnv::default();

    env.command()
        .args(["simulate", "--couriers", "3", "--parcels", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Published: 40"))
        .stdout(predicate::str::contains("Applied:   40"))
        .stdout(predicate::str::contains("Skipped:   0"))
        .stdout(predicate::str::contains("Notices:   40"))
        .stdout(predicate::str::contains("Parcels: 10"));
}

#[test]
fn test_simulate_zero_couriers_fails() {
    let env = TestEnv::default();

    env.command()
        .args(["simulate", "--couriers", "0"])
        .assert()
        .failure()
        .code(1);
}

// ============================================================================
// Routes and tools
// ============================================================================

#[test]
fn test_routes_forward() {
    let env = TestEnv::default();

    env.command()
        .args(["routes", "--from", "Casablanca", "--to", "Marrakech"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CTM Casablanca -> Marrakech: 240 km, 3h, 80 MAD (every_2h)",
        ))
        .stdout(predicate::str::contains("Leaving now arrives"));
}

#[test]
fn test_routes_reverse() {
    let env = TestEnv::default();

    env.command()
        .args(["routes", "--from", "Agadir", "--to", "Marrakech"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CTM Agadir -> Marrakech: 250 km, 3.5h, 90 MAD"));
}

#[test]
fn test_routes_unknown() {
    let env = TestEnv::default();

    env.command()
        .args(["routes", "--from", "Oujda", "--to", "Dakhla"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No CTM route from Oujda to Dakhla"));
}

#[test]
fn test_tools_listing() {
    let env = TestEnv::default();

    env.command()
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("update_parcel_status"))
        .stdout(predicate::str::contains("get_parcel_history"))
        .stdout(predicate::str::contains("book_ctm_transport"));
}

#[test]
fn test_tools_json() {
    let env = TestEnv::default();

    let output = env.command().args(["tools", "--json"]).output().unwrap();
    assert!(output.status.success());

    let definitions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let definitions = definitions.as_array().unwrap();
    assert_eq!(definitions.len(), 6);
    assert!(definitions.iter().all(|d| d["type"] == "function"));
}

#[test]
fn test_routes_with_negative_duration_fails() {
    let env = TestEnv::default();
    env.write_config(
        r#"{"network": {"routes": [
            {"origin": "Casablanca", "destination": "Rabat",
             "distance_km": 90, "duration_hours": -5.0, "cost_mad": 50}
        ]}}"#,
    )
    .unwrap();

    env.command()
        .args(["routes", "--from", "Casablanca", "--to", "Rabat"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unusable duration"));
}
