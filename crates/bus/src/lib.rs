//! Carrier status bus
//!
//! Couriers and carriers publish status updates inbound; tracking notices
//! for support channels flow outbound.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, trace};

/// Status update reported by a courier or carrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Reporting courier or carrier
    pub source: String,
    /// Parcel being reported on
    pub parcel_id: String,
    /// New status (open vocabulary)
    pub status: String,
    /// Free-text location
    pub location: String,
    /// Optional notes
    #[serde(default)]
    pub notes: String,
    /// When the update was submitted
    pub submitted_at: DateTime<Local>,
    /// Extra details from the reporter
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl StatusUpdate {
    /// Create new update
    pub fn new(
        source: impl Into<String>,
        parcel_id: impl Into<String>,
        status: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            parcel_id: parcel_id.into(),
            status: status.into(),
            location: location.into(),
            notes: String::new(),
            submitted_at: Local::now(),
            metadata: HashMap::new(),
        }
    }

    /// Attach notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Add reporter details
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), value);
        }
        self
    }
}

/// Notice about a parcel, addressed to a support channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingNotice {
    /// Target channel
    pub channel: String,
    /// Parcel the notice is about
    pub parcel_id: String,
    /// Human-readable content
    pub content: String,
    /// Update this notice answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl TrackingNotice {
    /// Create new notice
    pub fn new(
        channel: impl Into<String>,
        parcel_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            parcel_id: parcel_id.into(),
            content: content.into(),
            reply_to: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the update being answered
    pub fn reply_to(mut self, source: impl Into<String>) -> Self {
        self.reply_to = Some(source.into());
        self
    }

    /// Add notice details
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), value);
        }
        self
    }
}

pub type UpdateSender = mpsc::UnboundedSender<StatusUpdate>;
pub type UpdateReceiver = mpsc::UnboundedReceiver<StatusUpdate>;
pub type NoticeSender = mpsc::UnboundedSender<TrackingNotice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<TrackingNotice>;

/// Tracking bus handle, cheap to clone
#[derive(Debug, Clone)]
pub struct TrackingBus {
    updates: UpdateSender,
    notices: NoticeSender,
}

impl TrackingBus {
    pub fn new(updates: UpdateSender, notices: NoticeSender) -> Self {
        Self { updates, notices }
    }

    /// Create a bus with fresh channels
    pub fn channels() -> (Self, UpdateReceiver, NoticeReceiver) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        (Self::new(update_tx, notice_tx), update_rx, notice_rx)
    }

    /// Report a status update
    #[allow(clippy::result_large_err)]
    pub fn publish_update(
        &self,
        update: StatusUpdate,
    ) -> Result<(), mpsc::error::SendError<StatusUpdate>> {
        trace!("Update: {} -> {}", update.source, update.parcel_id);
        self.updates.send(update)
    }

    /// Send a notice to a support channel
    #[allow(clippy::result_large_err)]
    pub fn publish_notice(
        &self,
        notice: TrackingNotice,
    ) -> Result<(), mpsc::error::SendError<TrackingNotice>> {
        trace!("Notice: {} -> {}", notice.parcel_id, notice.channel);
        self.notices.send(notice)
    }

    pub fn notice_sender(&self) -> NoticeSender {
        self.notices.clone()
    }
}

/// Routes notices to per-channel handlers
pub struct NoticeDispatcher {
    receiver: NoticeReceiver,
    handlers: HashMap<String, Box<dyn Fn(TrackingNotice) + Send + Sync>>,
}

impl NoticeDispatcher {
    pub fn new(receiver: NoticeReceiver) -> Self {
        Self {
            receiver,
            handlers: HashMap::new(),
        }
    }

    /// Register a channel handler, replacing any previous one
    pub fn on_channel<F>(&mut self, channel: impl Into<String>, handler: F)
    where
        F: Fn(TrackingNotice) + Send + Sync + 'static,
    {
        self.handlers.insert(channel.into(), Box::new(handler));
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.handlers.contains_key(channel)
    }

    /// Dispatch until every sender is dropped; returns notices delivered
    pub async fn run(mut self) -> usize {
        debug!("Notice dispatcher started");

        let mut delivered = 0;
        while let Some(notice) = self.receiver.recv().await {
            if let Some(handler) = self.handlers.get(&notice.channel) {
                handler(notice);
                delivered += 1;
            } else {
                error!("No handler for channel: {}", notice.channel);
            }
        }

        debug!("Notice dispatcher stopped after {} notices", delivered);
        delivered
    }

    /// Dispatch every notice to one async handler
    pub async fn run_async<F, Fut>(mut self, handler: F)
    where
        F: Fn(TrackingNotice) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        debug!("Notice dispatcher started (async)");

        while let Some(notice) = self.receiver.recv().await {
            let fut = handler(notice);
            tokio::spawn(fut);
        }

        debug!("Notice dispatcher stopped");
    }
}
