//! Delivery agents' toolkit
//!
//! Tools exposed to delivery agents, the intercity carrier network, the
//! customer support desk and the carrier status ingest worker. All of them
//! work against a shared [`parceltrack_tracking::TrackingStore`].

use thiserror::Error;

pub mod ingest;
pub mod network;
pub mod support;
pub mod tools;

pub use ingest::{IngestReport, StatusIngest};
pub use network::{Booking, EtaEstimate, IntercityRoute, RouteTable};
pub use support::{Escalation, SupportDesk};
pub use tools::{ToolDefinition, ToolRegistry, ToolTrait};

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("tracking error: {0}")]
    Tracking(#[from] parceltrack_tracking::TrackingError),

    #[error("no route from {origin} to {destination}")]
    RouteNotFound { origin: String, destination: String },

    #[error("route {origin} -> {destination} has unusable duration {duration_hours}h")]
    InvalidRoute {
        origin: String,
        destination: String,
        duration_hours: f64,
    },
}

pub type Result<T> = std::result::Result<T, AgentError>;
