//! Notifications from the orchestrator to whoever renders the batch.
//!
//! The orchestrator calls the observer synchronously on every status or
//! progress change; it holds no presentation state of its own.

use tokio::sync::mpsc::UnboundedSender;

use crate::batch::{BatchOutcome, ItemStatus};

/// State of one item after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEvent {
    pub index: usize,
    pub status: ItemStatus,
    pub progress_percent: u8,
    /// Present iff `status` is Done.
    pub download_url: Option<String>,
    /// Present iff `status` is Failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Item(ItemEvent),
    /// Emitted once, after the last item settled and aggregation ran.
    Finished(BatchOutcome),
}

/// Receives batch notifications. Observers only read.
pub trait BatchObserver {
    fn on_item(&mut self, event: &ItemEvent);

    fn on_outcome(&mut self, _outcome: &BatchOutcome) {}
}

/// Records every notification in order.
impl BatchObserver for Vec<BatchEvent> {
    fn on_item(&mut self, event: &ItemEvent) {
        self.push(BatchEvent::Item(event.clone()));
    }

    fn on_outcome(&mut self, outcome: &BatchOutcome) {
        self.push(BatchEvent::Finished(outcome.clone()));
    }
}

/// Forwards notifications to an async consumer (e.g. a renderer task).
///
/// Dropping the receiver is how a caller stops listening; the batch itself
/// keeps running.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<BatchEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<BatchEvent>) -> Self {
        Self { tx }
    }
}

impl BatchObserver for ChannelObserver {
    fn on_item(&mut self, event: &ItemEvent) {
        let _ = self.tx.send(BatchEvent::Item(event.clone()));
    }

    fn on_outcome(&mut self, outcome: &BatchOutcome) {
        let _ = self.tx.send(BatchEvent::Finished(outcome.clone()));
    }
}
