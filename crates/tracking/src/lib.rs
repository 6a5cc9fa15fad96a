//! Parcel tracking store
//!
//! Keeps an append-only status history per parcel and answers point
//! queries (current status) and range queries (full history). The store is
//! an owned handle: clone it to share the same state between callers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::debug;

/// Message carried by a not-found status view unless overridden
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "No tracking information available";

/// Status marker of a successful update
pub const STATUS_UPDATED: &str = "updated";

/// Status marker of a status lookup for an unknown parcel
pub const STATUS_NOT_FOUND: &str = "not_found";

/// Tracking errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    #[error("parcel id must not be empty")]
    EmptyParcelId,
}

pub type Result<T> = std::result::Result<T, TrackingError>;

/// One immutable status record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    timestamp: DateTime<Local>,
    status: String,
    location: String,
    /// Serialized as `null` when the update carried no notes
    #[serde(default)]
    notes: Option<String>,
    sequence: u64,
}

impl TrackingEvent {
    /// Wall-clock time the event was recorded
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Notes of the update; an empty string was recorded as `None`
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// 1-based position in the parcel's history
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Confirmation returned by [`TrackingStore::update_status`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub parcel_id: String,
    /// Always [`STATUS_UPDATED`]
    pub status: String,
    pub latest_event: TrackingEvent,
}

/// Current status of a parcel, derived from its latest event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusView {
    Found {
        parcel_id: String,
        current_status: String,
        current_location: String,
        last_updated: DateTime<Local>,
        notes: Option<String>,
    },
    NotFound {
        parcel_id: String,
        /// Always [`STATUS_NOT_FOUND`]
        status: String,
        message: String,
    },
}

impl StatusView {
    pub fn is_found(&self) -> bool {
        matches!(self, StatusView::Found { .. })
    }

    pub fn parcel_id(&self) -> &str {
        match self {
            StatusView::Found { parcel_id, .. } | StatusView::NotFound { parcel_id, .. } => {
                parcel_id
            }
        }
    }

    pub fn current_status(&self) -> Option<&str> {
        match self {
            StatusView::Found { current_status, .. } => Some(current_status),
            StatusView::NotFound { .. } => None,
        }
    }

    pub fn current_location(&self) -> Option<&str> {
        match self {
            StatusView::Found {
                current_location, ..
            } => Some(current_location),
            StatusView::NotFound { .. } => None,
        }
    }
}

/// Aggregate counts across all parcels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSummary {
    pub total_parcels: usize,
    pub total_events: usize,
    /// Parcels per current status
    pub by_status: BTreeMap<String, usize>,
}

impl TrackingSummary {
    /// Number of parcels whose current status is `status`
    pub fn count(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or(0)
    }
}

/// Ordered events of one parcel
#[derive(Debug, Default)]
struct ParcelHistory {
    events: Vec<TrackingEvent>,
}

impl ParcelHistory {
    fn append(&mut self, status: String, location: String, notes: Option<String>) -> TrackingEvent {
        let event = TrackingEvent {
            timestamp: Local::now(),
            status,
            location,
            notes,
            sequence: self.events.len() as u64 + 1,
        };
        self.events.push(event.clone());
        event
    }

    fn latest(&self) -> Option<&TrackingEvent> {
        self.events.last()
    }
}

type SharedHistory = Arc<Mutex<ParcelHistory>>;

// Histories are append-only, so a panic while holding a lock cannot leave
// one half-written. Poisoned locks are recovered.
fn lock(history: &Mutex<ParcelHistory>) -> MutexGuard<'_, ParcelHistory> {
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

fn latest_event(history: &Mutex<ParcelHistory>) -> Option<TrackingEvent> {
    let history = lock(history);
    history.latest().cloned()
}

fn all_events(history: &Mutex<ParcelHistory>) -> Vec<TrackingEvent> {
    let history = lock(history);
    history.events.clone()
}

fn event_count(history: &Mutex<ParcelHistory>) -> usize {
    let history = lock(history);
    history.events.len()
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// In-process record of parcel status changes
///
/// Updates to the same parcel are serialized by a per-parcel lock; the
/// parcel index is only write-locked when a parcel is seen for the first
/// time.
#[derive(Debug, Clone)]
pub struct TrackingStore {
    parcels: Arc<RwLock<HashMap<String, SharedHistory>>>,
    not_found_message: Arc<str>,
}

impl TrackingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_not_found_message(DEFAULT_NOT_FOUND_MESSAGE)
    }

    /// Create an empty store with a custom not-found message
    pub fn with_not_found_message(message: impl AsRef<str>) -> Self {
        Self {
            parcels: Arc::new(RwLock::new(HashMap::new())),
            not_found_message: Arc::from(message.as_ref()),
        }
    }

    /// Append a status event to a parcel's history, creating the history on
    /// first use. An empty `notes` string is stored as no notes.
    pub fn update_status(
        &self,
        parcel_id: &str,
        status: impl Into<String>,
        location: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<UpdateResult> {
        if parcel_id.trim().is_empty() {
            return Err(TrackingError::EmptyParcelId);
        }

        let notes = notes.into();
        let notes = if notes.is_empty() { None } else { Some(notes) };

        let history = self.history_or_insert(parcel_id);
        let event = lock(&history).append(status.into(), location.into(), notes);

        debug!(
            "Updated {}: {} at {}",
            parcel_id, event.status, event.location
        );

        Ok(UpdateResult {
            parcel_id: parcel_id.to_string(),
            status: STATUS_UPDATED.to_string(),
            latest_event: event,
        })
    }

    /// Current status of a parcel, or a not-found view if it has no history
    pub fn get_status(&self, parcel_id: &str) -> StatusView {
        let latest = self
            .history(parcel_id)
            .and_then(|history| latest_event(&history));

        match latest {
            Some(event) => StatusView::Found {
                parcel_id: parcel_id.to_string(),
                current_status: event.status,
                current_location: event.location,
                last_updated: event.timestamp,
                notes: event.notes,
            },
            None => StatusView::NotFound {
                parcel_id: parcel_id.to_string(),
                status: STATUS_NOT_FOUND.to_string(),
                message: self.not_found_message.to_string(),
            },
        }
    }

    /// Full ordered history of a parcel; empty for an unknown parcel
    pub fn get_history(&self, parcel_id: &str) -> Vec<TrackingEvent> {
        let events = self
            .history(parcel_id)
            .map(|history| all_events(&history))
            .unwrap_or_default();

        debug!("Retrieved {} events for {}", events.len(), parcel_id);
        events
    }

    /// Number of events recorded for a parcel
    pub fn history_len(&self, parcel_id: &str) -> usize {
        self.history(parcel_id)
            .map(|history| event_count(&history))
            .unwrap_or(0)
    }

    /// All known parcel ids, sorted
    pub fn parcel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = read(&self.parcels).keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of known parcels
    pub fn len(&self) -> usize {
        read(&self.parcels).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count parcels and events, grouping parcels by current status
    pub fn summary(&self) -> TrackingSummary {
        let parcels = read(&self.parcels);
        let mut summary = TrackingSummary {
            total_parcels: parcels.len(),
            ..TrackingSummary::default()
        };

        for history in parcels.values() {
            let history = lock(history);
            summary.total_events += history.events.len();
            if let Some(latest) = history.latest() {
                *summary.by_status.entry(latest.status.clone()).or_insert(0) += 1;
            }
        }

        summary
    }

    fn history(&self, parcel_id: &str) -> Option<SharedHistory> {
        read(&self.parcels).get(parcel_id).cloned()
    }

    fn history_or_insert(&self, parcel_id: &str) -> SharedHistory {
        if let Some(history) = self.history(parcel_id) {
            return history;
        }

        write(&self.parcels)
            .entry(parcel_id.to_string())
            .or_default()
            .clone()
    }
}

impl Default for TrackingStore {
    fn default() -> Self {
        Self::new()
    }
}
