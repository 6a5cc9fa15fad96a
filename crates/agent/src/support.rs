//! Customer support desk
//!
//! Answers "where is my parcel" queries from the tracking store and
//! escalates issues to operations.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use parceltrack_tracking::{StatusView, TrackingEvent, TrackingStore};

/// Escalated customer issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub parcel_id: String,
    pub issue: String,
    pub escalated_to: String,
    pub ticket_id: String,
}

/// Phrase used for a status in customer-facing text
pub fn status_phrase(status: &str) -> String {
    match status {
        "picked_up" => "picked up".to_string(),
        "in_transit" => "in transit".to_string(),
        "ctm_booked" => "booked on intercity transport".to_string(),
        "out_for_delivery" => "out for delivery".to_string(),
        other => other.replace('_', " "),
    }
}

pub struct SupportDesk {
    store: TrackingStore,
    escalate_to: String,
}

impl SupportDesk {
    pub fn new(store: TrackingStore, escalate_to: impl Into<String>) -> Self {
        Self {
            store,
            escalate_to: escalate_to.into(),
        }
    }

    /// Answer a customer query, asking for a tracking number if none is given
    pub fn answer(&self, query: &str, parcel_id: Option<&str>) -> String {
        info!("Handling query: {}", query);

        match parcel_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(parcel_id) => self.describe_status(&self.store.get_status(parcel_id)),
            None => "I'd be happy to help! Could you please provide your parcel tracking number?"
                .to_string(),
        }
    }

    /// Customer-facing sentence for a status view
    pub fn describe_status(&self, view: &StatusView) -> String {
        match view {
            StatusView::Found {
                parcel_id,
                current_status,
                current_location,
                last_updated,
                notes,
            } => {
                let mut text = format!(
                    "Your parcel {} is currently {}",
                    parcel_id,
                    status_phrase(current_status)
                );
                if !current_location.is_empty() {
                    text.push_str(&format!(" ({})", current_location));
                }
                text.push_str(&format!(
                    ". Last update: {}.",
                    last_updated.format("%Y-%m-%d %H:%M")
                ));
                if let Some(notes) = notes {
                    text.push_str(&format!(" Note: {}", notes));
                }
                text
            }
            StatusView::NotFound {
                parcel_id, message, ..
            } => format!(
                "Sorry, I couldn't find parcel {}. {}.",
                parcel_id, message
            ),
        }
    }

    /// One line per tracking event, oldest first
    pub fn describe_history(&self, parcel_id: &str) -> Vec<String> {
        self.store
            .get_history(parcel_id)
            .iter()
            .map(history_line)
            .collect()
    }

    /// Hand an issue over to operations
    pub fn escalate(&self, parcel_id: &str, issue: &str) -> Escalation {
        info!("Escalating issue for {}: {}", parcel_id, issue);

        Escalation {
            parcel_id: parcel_id.to_string(),
            issue: issue.to_string(),
            escalated_to: self.escalate_to.clone(),
            ticket_id: format!("TICKET_{}", Uuid::new_v4().simple()),
        }
    }
}

fn history_line(event: &TrackingEvent) -> String {
    format!(
        "{}: {} at {}",
        event.timestamp().format("%Y-%m-%d %H:%M:%S"),
        event.status(),
        event.location()
    )
}
