//! Intercity carrier network
//!
//! Route lookup, arrival estimates and transport booking over the
//! configured carrier routes. A booking is recorded as a `ctm_booked`
//! tracking milestone at the origin depot.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use parceltrack_config::{NetworkConfig, RouteConfig};
use parceltrack_tracking::TrackingStore;

use crate::{AgentError, Result};

/// Status recorded when intercity transport is booked
pub const STATUS_CTM_BOOKED: &str = "ctm_booked";

/// A route between two cities as offered by the carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntercityRoute {
    pub origin: String,
    pub destination: String,
    pub carrier: String,
    pub distance_km: f64,
    pub duration_hours: f64,
    pub cost_mad: u32,
    pub frequency: String,
}

/// Arrival estimate for an intercity leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaEstimate {
    pub origin: String,
    pub destination: String,
    pub estimated_duration_hours: f64,
    pub departure: DateTime<Local>,
    pub estimated_arrival: DateTime<Local>,
}

/// Confirmed intercity booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub status: String,
    pub booking_id: String,
    pub parcel_id: String,
    pub route: IntercityRoute,
    pub pickup_location: String,
    pub delivery_location: String,
    pub cost_mad: u32,
}

/// Depot name of a carrier in a city
pub fn depot(carrier: &str, city: &str) -> String {
    format!("{}_Depot_{}", carrier, city)
}

/// Carrier routes, looked up in either direction
#[derive(Debug, Clone)]
pub struct RouteTable {
    carrier: String,
    routes: Vec<RouteConfig>,
}

impl RouteTable {
    pub fn new(carrier: impl Into<String>, routes: Vec<RouteConfig>) -> Self {
        Self {
            carrier: carrier.into(),
            routes,
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.carrier.clone(), config.routes.clone())
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes from `origin` to `destination`. A route configured in the
    /// opposite direction is returned with its endpoints swapped.
    pub fn routes(&self, origin: &str, destination: &str) -> Vec<IntercityRoute> {
        let forward = self
            .routes
            .iter()
            .find(|r| r.origin == origin && r.destination == destination);
        let route = forward.or_else(|| {
            self.routes
                .iter()
                .find(|r| r.origin == destination && r.destination == origin)
        });

        route
            .map(|r| {
                vec![IntercityRoute {
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    carrier: self.carrier.clone(),
                    distance_km: r.distance_km,
                    duration_hours: r.duration_hours,
                    cost_mad: r.cost_mad,
                    frequency: r.frequency.clone(),
                }]
            })
            .unwrap_or_default()
    }

    /// Estimate arrival for a departure time
    pub fn estimate_eta(
        &self,
        origin: &str,
        destination: &str,
        departure: DateTime<Local>,
    ) -> Result<EtaEstimate> {
        let route = self.first_route(origin, destination)?;
        let estimated_arrival = travel_time(&route)
            .and_then(|travel| departure.checked_add_signed(travel))
            .ok_or_else(|| AgentError::InvalidRoute {
                origin: route.origin.clone(),
                destination: route.destination.clone(),
                duration_hours: route.duration_hours,
            })?;

        Ok(EtaEstimate {
            origin: route.origin,
            destination: route.destination,
            estimated_duration_hours: route.duration_hours,
            departure,
            estimated_arrival,
        })
    }

    /// Book transport for a parcel and record the booking milestone
    pub fn book(
        &self,
        store: &TrackingStore,
        parcel_id: &str,
        origin: &str,
        destination: &str,
    ) -> Result<Booking> {
        info!(
            "Booking {} transport for {}: {} -> {}",
            self.carrier, parcel_id, origin, destination
        );

        let route = self.first_route(origin, destination)?;
        let booking_id = format!("{}_{}", self.carrier, parcel_id);
        let pickup_location = depot(&self.carrier, origin);

        store.update_status(
            parcel_id,
            STATUS_CTM_BOOKED,
            pickup_location.clone(),
            format!("Booking {} to {}", booking_id, destination),
        )?;

        debug!("Booked {} for {}", booking_id, parcel_id);

        Ok(Booking {
            status: "confirmed".to_string(),
            booking_id,
            parcel_id: parcel_id.to_string(),
            cost_mad: route.cost_mad,
            pickup_location,
            delivery_location: depot(&self.carrier, destination),
            route,
        })
    }

    fn first_route(&self, origin: &str, destination: &str) -> Result<IntercityRoute> {
        self.routes(origin, destination)
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::RouteNotFound {
                origin: origin.to_string(),
                destination: destination.to_string(),
            })
    }
}

/// Route duration as a time delta; `None` unless finite, non-negative and
/// representable
fn travel_time(route: &IntercityRoute) -> Option<Duration> {
    let minutes = (route.duration_hours * 60.0).round();
    if !minutes.is_finite() || minutes < 0.0 || minutes > i64::MAX as f64 {
        return None;
    }
    Duration::try_minutes(minutes as i64)
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_config(&NetworkConfig::default())
    }
}
