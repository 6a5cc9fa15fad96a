//! Parcel tracking tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use parceltrack_tracking::TrackingStore;

use super::ToolTrait;

/// Record a status change for a parcel
pub struct UpdateParcelStatusTool {
    store: TrackingStore,
}

impl UpdateParcelStatusTool {
    pub fn new(store: TrackingStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct UpdateArgs {
    parcel_id: String,
    status: String,
    location: String,
    #[serde(default)]
    notes: String,
}

#[async_trait]
impl ToolTrait for UpdateParcelStatusTool {
    fn name(&self) -> &str {
        "update_parcel_status"
    }
    fn description(&self) -> &str {
        "Record a parcel status change (e.g. picked_up, in_transit, delivered) at a location."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "parcel_id": { "type": "string", "description": "Parcel identifier" },
                "status": { "type": "string", "description": "New status, e.g. picked_up, in_transit, delivered" },
                "location": { "type": "string", "description": "Current location" },
                "notes": { "type": "string", "description": "Optional notes" }
            },
            "required": ["parcel_id", "status", "location"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args: UpdateArgs = serde_json::from_value(args)?;

        let result = self
            .store
            .update_status(&args.parcel_id, args.status, args.location, args.notes)?;

        Ok(serde_json::to_string_pretty(&result)?)
    }
}

/// Current status of a parcel
pub struct GetParcelStatusTool {
    store: TrackingStore,
}

impl GetParcelStatusTool {
    pub fn new(store: TrackingStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct ParcelArgs {
    parcel_id: String,
}

fn parcel_parameters() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "parcel_id": { "type": "string", "description": "Parcel identifier" }
        },
        "required": ["parcel_id"]
    })
}

#[async_trait]
impl ToolTrait for GetParcelStatusTool {
    fn name(&self) -> &str {
        "get_parcel_status"
    }
    fn description(&self) -> &str {
        "Get the current status, location and last update time of a parcel."
    }

    fn parameters(&self) -> serde_json::Value {
        parcel_parameters()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args: ParcelArgs = serde_json::from_value(args)?;
        let view = self.store.get_status(&args.parcel_id);
        Ok(serde_json::to_string_pretty(&view)?)
    }
}

/// Full tracking history of a parcel
pub struct GetParcelHistoryTool {
    store: TrackingStore,
}

impl GetParcelHistoryTool {
    pub fn new(store: TrackingStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolTrait for GetParcelHistoryTool {
    fn name(&self) -> &str {
        "get_parcel_history"
    }
    fn description(&self) -> &str {
        "Get every tracking event of a parcel, oldest first. Unknown parcels have an empty history."
    }

    fn parameters(&self) -> serde_json::Value {
        parcel_parameters()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args: ParcelArgs = serde_json::from_value(args)?;
        let history = self.store.get_history(&args.parcel_id);

        debug!("History tool returned {} events", history.len());
        Ok(serde_json::to_string_pretty(&history)?)
    }
}
