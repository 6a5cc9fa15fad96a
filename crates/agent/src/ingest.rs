//! Carrier status ingest
//!
//! Single consumer of the bus update channel. Updates are applied to the
//! tracking store in arrival order and each applied update is announced on
//! the support notice channel.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use parceltrack_bus::{NoticeSender, StatusUpdate, TrackingNotice, UpdateReceiver};
use parceltrack_tracking::{TrackingStore, UpdateResult};

use crate::support::status_phrase;
use crate::Result;

/// Outcome of an ingest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub applied: usize,
    pub skipped: usize,
}

pub struct StatusIngest {
    store: TrackingStore,
    notices: NoticeSender,
    notice_channel: String,
}

impl StatusIngest {
    /// Holds only the notice side of the bus, so the update channel closes
    /// once every publisher is dropped.
    pub fn new(
        store: TrackingStore,
        notices: NoticeSender,
        notice_channel: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notices,
            notice_channel: notice_channel.into(),
        }
    }

    /// Apply one update and announce it
    pub fn apply(&self, update: &StatusUpdate) -> Result<UpdateResult> {
        let result = self.store.update_status(
            &update.parcel_id,
            update.status.as_str(),
            update.location.as_str(),
            update.notes.as_str(),
        )?;

        let notice = TrackingNotice::new(
            self.notice_channel.as_str(),
            update.parcel_id.as_str(),
            format!(
                "Parcel {} {} at {}",
                update.parcel_id,
                status_phrase(&update.status),
                update.location
            ),
        )
        .reply_to(update.source.as_str())
        .with_metadata("sequence", result.latest_event.sequence());

        if self.notices.send(notice).is_err() {
            debug!("Notice channel closed, dropping notice for {}", update.parcel_id);
        }

        Ok(result)
    }

    /// Consume updates until every publisher is gone
    pub async fn run(self, mut updates: UpdateReceiver) -> IngestReport {
        info!("Status ingest started");

        let mut report = IngestReport::default();
        while let Some(update) = updates.recv().await {
            match self.apply(&update) {
                Ok(_) => report.applied += 1,
                Err(e) => {
                    warn!("Skipped update from {}: {}", update.source, e);
                    report.skipped += 1;
                }
            }
        }

        info!(
            "Status ingest stopped: {} applied, {} skipped",
            report.applied, report.skipped
        );
        report
    }
}
