//! Tests for parcel tracking tools

use parceltrack_agent::tools::{
    GetParcelHistoryTool, GetParcelStatusTool, ToolTrait, UpdateParcelStatusTool,
};
use parceltrack_tracking::TrackingStore;
use serde_json::{json, Value};

async fn run(tool: &dyn ToolTrait, args: Value) -> Value {
    let output = tool.execute(args).await.expect("tool should succeed");
    serde_json::from_str(&output).expect("tool output should be JSON")
}

#[tokio::test]
async fn test_update_returns_confirmation() {
    let store = TrackingStore::new();
    let tool = UpdateParcelStatusTool::new(store.clone());

    let result = run(
        &tool,
        json!({
            "parcel_id": "PKG_123",
            "status": "picked_up",
            "location": "Casablanca Depot",
            "notes": "2 boxes"
        }),
    )
    .await;

    assert_eq!(result["parcel_id"], "PKG_123");
    assert_eq!(result["status"], "updated");
    assert_eq!(result["latest_event"]["status"], "picked_up");
    assert_eq!(result["latest_event"]["location"], "Casablanca Depot");
    assert_eq!(result["latest_event"]["notes"], "2 boxes");
    assert!(result["latest_event"]["timestamp"].is_string());
    assert_eq!(store.history_len("PKG_123"), 1);
}

#[tokio::test]
async fn test_update_notes_are_optional() {
    let store = TrackingStore::new();
    let tool = UpdateParcelStatusTool::new(store.clone());

    let result = run(
        &tool,
        json!({"parcel_id": "PKG_1", "status": "in_transit", "location": "A7"}),
    )
    .await;

    assert!(result["latest_event"]["notes"].is_null());
}

#[tokio::test]
async fn test_update_missing_arguments_is_error() {
    let tool = UpdateParcelStatusTool::new(TrackingStore::new());

    let result = tool.execute(json!({"parcel_id": "PKG_1"})).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_empty_parcel_id_is_error() {
    let store = TrackingStore::new();
    let tool = UpdateParcelStatusTool::new(store.clone());

    let result = tool
        .execute(json!({"parcel_id": "", "status": "picked_up", "location": "Fes"}))
        .await;

    assert!(result.unwrap_err().to_string().contains("empty"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_status_not_found_shape() {
    let tool = GetParcelStatusTool::new(TrackingStore::new());

    let result = run(&tool, json!({"parcel_id": "NONEXISTENT"})).await;

    assert_eq!(result["parcel_id"], "NONEXISTENT");
    assert_eq!(result["status"], "not_found");
    assert_eq!(result["message"], "No tracking information available");
}

#[tokio::test]
async fn test_status_after_updates() {
    let store = TrackingStore::new();
    store
        .update_status("PKG_123", "picked_up", "Casablanca Depot", "")
        .unwrap();
    store
        .update_status("PKG_123", "in_transit", "En route to Rabat", "")
        .unwrap();

    let tool = GetParcelStatusTool::new(store);
    let result = run(&tool, json!({"parcel_id": "PKG_123"})).await;

    assert_eq!(result["current_status"], "in_transit");
    assert_eq!(result["current_location"], "En route to Rabat");
    assert!(result["last_updated"].is_string());
}

#[tokio::test]
async fn test_history_unknown_is_empty_list() {
    let tool = GetParcelHistoryTool::new(TrackingStore::new());

    let result = run(&tool, json!({"parcel_id": "NONEXISTENT"})).await;
    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_history_in_call_order() {
    let store = TrackingStore::new();
    for status in ["picked_up", "ctm_booked", "in_transit", "delivered"] {
        store.update_status("PKG_9", status, "Somewhere", "").unwrap();
    }

    let tool = GetParcelHistoryTool::new(store);
    let result = run(&tool, json!({"parcel_id": "PKG_9"})).await;

    let statuses: Vec<&str> = result
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["picked_up", "ctm_booked", "in_transit", "delivered"]);
    assert_eq!(result[3]["sequence"], 4);
}
