//! Intercity transport tools

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::json;

use parceltrack_tracking::TrackingStore;

use super::ToolTrait;
use crate::network::RouteTable;
use crate::AgentError;

#[derive(Deserialize)]
struct LegArgs {
    origin_city: String,
    destination_city: String,
}

/// Carrier routes between two cities
pub struct GetIntercityRoutesTool {
    routes: RouteTable,
}

impl GetIntercityRoutesTool {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }
}

#[async_trait]
impl ToolTrait for GetIntercityRoutesTool {
    fn name(&self) -> &str {
        "get_intercity_routes"
    }
    fn description(&self) -> &str {
        "List carrier routes between two cities with distance, duration, cost and frequency."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "origin_city": { "type": "string", "description": "Origin city name" },
                "destination_city": { "type": "string", "description": "Destination city name" }
            },
            "required": ["origin_city", "destination_city"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args: LegArgs = serde_json::from_value(args)?;
        let routes = self.routes.routes(&args.origin_city, &args.destination_city);
        Ok(serde_json::to_string_pretty(&routes)?)
    }
}

#[derive(Deserialize)]
struct EtaArgs {
    origin_city: String,
    destination_city: String,
    #[serde(default)]
    departure_time: Option<DateTime<Local>>,
}

/// Arrival estimate for an intercity leg
pub struct EstimateIntercityEtaTool {
    routes: RouteTable,
}

impl EstimateIntercityEtaTool {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }
}

#[async_trait]
impl ToolTrait for EstimateIntercityEtaTool {
    fn name(&self) -> &str {
        "estimate_intercity_eta"
    }
    fn description(&self) -> &str {
        "Estimate arrival time of an intercity leg. Departure defaults to now."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "origin_city": { "type": "string", "description": "Origin city name" },
                "destination_city": { "type": "string", "description": "Destination city name" },
                "departure_time": { "type": "string", "description": "Planned departure (ISO 8601)" }
            },
            "required": ["origin_city", "destination_city"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args: EtaArgs = serde_json::from_value(args)?;
        let departure = args.departure_time.unwrap_or_else(Local::now);

        let value = match self
            .routes
            .estimate_eta(&args.origin_city, &args.destination_city, departure)
        {
            Ok(eta) => serde_json::to_value(eta)?,
            Err(AgentError::RouteNotFound { .. }) => json!({ "error": "No route found" }),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[derive(Deserialize)]
struct BookingArgs {
    parcel_id: String,
    origin_city: String,
    destination_city: String,
    #[serde(default)]
    parcel_details: serde_json::Value,
}

/// Book intercity transport and record the booking on the parcel
pub struct BookCtmTransportTool {
    routes: RouteTable,
    store: TrackingStore,
}

impl BookCtmTransportTool {
    pub fn new(routes: RouteTable, store: TrackingStore) -> Self {
        Self { routes, store }
    }
}

#[async_trait]
impl ToolTrait for BookCtmTransportTool {
    fn name(&self) -> &str {
        "book_ctm_transport"
    }
    fn description(&self) -> &str {
        "Book carrier transport for a parcel between two cities and record it as ctm_booked."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "parcel_id": { "type": "string", "description": "Parcel identifier" },
                "origin_city": { "type": "string", "description": "Origin city" },
                "destination_city": { "type": "string", "description": "Destination city" },
                "parcel_details": { "type": "object", "description": "Size, weight, etc." }
            },
            "required": ["parcel_id", "origin_city", "destination_city"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args: BookingArgs = serde_json::from_value(args)?;

        let value = match self.routes.book(
            &self.store,
            &args.parcel_id,
            &args.origin_city,
            &args.destination_city,
        ) {
            Ok(booking) => {
                let mut value = serde_json::to_value(booking)?;
                if !args.parcel_details.is_null() {
                    value["parcel_details"] = args.parcel_details;
                }
                value
            }
            Err(AgentError::RouteNotFound { .. }) => {
                json!({ "status": "failed", "error": "No route available" })
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::to_string_pretty(&value)?)
    }
}
