//! A batch: ordered items, shared options, and the final deliverable.

use super::item::{Item, ItemStatus};
use crate::aggregate::BundleError;
use crate::options::BatchOptions;
use crate::source::SourceFile;

/// What the caller gets to download once every item has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Exactly one item succeeded; its link, verbatim.
    SingleDownload(String),
    /// Several items succeeded and the service bundled them.
    BundleDownload(String),
    /// Several items succeeded but the bundle could not be produced.
    /// The individual links are still on the items.
    BundleUnavailable(BundleError),
    /// No item succeeded (or the batch was empty).
    NoSuccessfulItems,
}

impl BatchOutcome {
    /// Link to offer, if any.
    pub fn link(&self) -> Option<&str> {
        match self {
            BatchOutcome::SingleDownload(url) | BatchOutcome::BundleDownload(url) => Some(url),
            BatchOutcome::BundleUnavailable(_) | BatchOutcome::NoSuccessfulItems => None,
        }
    }
}

/// Items of one run plus its options. A new selection means a new session.
#[derive(Debug, Clone)]
pub struct BatchSession {
    options: BatchOptions,
    pub(crate) items: Vec<Item>,
    pub(crate) outcome: Option<BatchOutcome>,
}

impl BatchSession {
    /// Pending items in the order given; `index` follows that order.
    pub fn new(files: Vec<SourceFile>, options: BatchOptions) -> Self {
        let items = files
            .into_iter()
            .enumerate()
            .map(|(i, f)| Item::new(i, f))
            .collect();
        Self {
            options,
            items,
            outcome: None,
        }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Set once aggregation ran.
    pub fn outcome(&self) -> Option<&BatchOutcome> {
        self.outcome.as_ref()
    }

    pub fn done_count(&self) -> usize {
        self.count(ItemStatus::Done)
    }

    pub fn failed_count(&self) -> usize {
        self.count(ItemStatus::Failed)
    }

    pub fn is_settled(&self) -> bool {
        self.items.iter().all(|i| i.status().is_terminal()) && self.outcome.is_some()
    }

    fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status() == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            size_bytes: 1,
            mime_type: "video/mp4".into(),
        }
    }

    #[test]
    fn new_session_indexes_in_order() {
        let s = BatchSession::new(vec![file("x.mp4"), file("y.mp4")], BatchOptions::default());
        let idx: Vec<_> = s.items().iter().map(|i| (i.index(), i.file().name.clone())).collect();
        assert_eq!(idx, [(0, "x.mp4".to_string()), (1, "y.mp4".to_string())]);
        assert!(s.items().iter().all(|i| i.status() == ItemStatus::Pending));
        assert!(s.outcome().is_none());
        assert!(!s.is_settled());
    }

    #[test]
    fn outcome_link() {
        assert_eq!(BatchOutcome::SingleDownload("/a".into()).link(), Some("/a"));
        assert_eq!(BatchOutcome::BundleDownload("/b.zip".into()).link(), Some("/b.zip"));
        assert_eq!(BatchOutcome::NoSuccessfulItems.link(), None);
    }
}
