//! One file moving through `Pending → Uploading → Converting → {Done | Failed}`.

use crate::events::ItemEvent;
use crate::service::ServiceError;
use crate::source::SourceFile;

/// Lifecycle status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Uploading,
    Converting,
    Done,
    Failed,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Uploading => "uploading",
            ItemStatus::Converting => "converting",
            ItemStatus::Done => "done",
            ItemStatus::Failed => "failed",
        }
    }

    /// Done or Failed: no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Done | ItemStatus::Failed)
    }

    fn is_active(self) -> bool {
        matches!(self, ItemStatus::Uploading | ItemStatus::Converting)
    }
}

/// Result attached to a terminal item.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Settled {
    Done(String),
    Failed(ServiceError),
}

/// One file of a batch.
///
/// Transitions return `true` when applied. Anything arriving after the item is
/// terminal is refused, so the first terminal signal wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    index: usize,
    file: SourceFile,
    status: ItemStatus,
    progress_percent: u8,
    settled: Option<Settled>,
}

impl Item {
    pub fn new(index: usize, file: SourceFile) -> Self {
        Self {
            index,
            file,
            status: ItemStatus::Pending,
            progress_percent: 0,
            settled: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Set iff the item is Done.
    pub fn download_url(&self) -> Option<&str> {
        match &self.settled {
            Some(Settled::Done(url)) => Some(url),
            _ => None,
        }
    }

    /// Set iff the item is Failed.
    pub fn error(&self) -> Option<&ServiceError> {
        match &self.settled {
            Some(Settled::Failed(e)) => Some(e),
            _ => None,
        }
    }

    /// Pending → Uploading.
    pub fn begin_upload(&mut self) -> bool {
        self.advance(ItemStatus::Pending, ItemStatus::Uploading)
    }

    /// Uploading → Converting. The conversion phase is a new progress track
    /// starting at `seed`, whatever the upload reached.
    pub fn begin_converting(&mut self, seed: u8) -> bool {
        if !self.advance(ItemStatus::Uploading, ItemStatus::Converting) {
            return false;
        }
        self.progress_percent = seed.min(99);
        true
    }

    /// Raise progress within the current phase. Values below the current one
    /// are ignored; 100 is reserved for Done.
    pub fn set_progress(&mut self, pct: u8) -> bool {
        let pct = pct.min(99);
        if !self.status.is_active() || pct <= self.progress_percent {
            return false;
        }
        self.progress_percent = pct;
        true
    }

    /// Any non-terminal status → Done with the download reference.
    pub fn complete(&mut self, download_url: String) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ItemStatus::Done;
        self.progress_percent = 100;
        self.settled = Some(Settled::Done(download_url));
        true
    }

    /// Any non-terminal status → Failed. Progress keeps its last value.
    pub fn fail(&mut self, error: ServiceError) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ItemStatus::Failed;
        self.settled = Some(Settled::Failed(error));
        true
    }

    /// Snapshot for observers.
    pub fn event(&self) -> ItemEvent {
        ItemEvent {
            index: self.index,
            status: self.status,
            progress_percent: self.progress_percent,
            download_url: self.download_url().map(str::to_string),
            error: self.error().map(ToString::to_string),
        }
    }

    fn advance(&mut self, from: ItemStatus, to: ItemStatus) -> bool {
        if self.status != from {
            return false;
        }
        self.status = to;
        true
    }
}
