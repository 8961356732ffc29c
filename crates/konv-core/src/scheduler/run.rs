//! Run a whole batch: items in order, then aggregation.

use rand::Rng;

use super::item::run_item;
use super::policy::RunPolicy;
use super::queue::SequentialQueue;
use crate::aggregate;
use crate::batch::{BatchOutcome, BatchSession, Item};
use crate::events::BatchObserver;
use crate::options::BatchOptions;
use crate::service::ConversionService;
use crate::source::SourceFile;

/// Runs `items` strictly in index order, one in flight at a time.
///
/// Item failures are recorded on the item; they never stop the batch.
pub async fn run_items<S, O, R>(
    service: &S,
    items: &mut [Item],
    options: &BatchOptions,
    policy: &RunPolicy,
    observer: &mut O,
    rng: &mut R,
) where
    S: ConversionService + ?Sized,
    O: BatchObserver + ?Sized,
    R: Rng + ?Sized,
{
    let mut queue = SequentialQueue::new(items.len());
    while let Some(index) = queue.next() {
        let item = &mut items[index];
        run_item(service, item, options, policy, observer, rng).await;
        debug_assert!(item.status().is_terminal());
        queue.settle(index);
    }
    debug_assert!(queue.is_drained());
}

/// Runs every item of `session`, then decides and records the outcome.
///
/// The observer gets every item change followed by one outcome notification.
pub async fn run_session<S, O, R>(
    service: &S,
    session: &mut BatchSession,
    policy: &RunPolicy,
    observer: &mut O,
    rng: &mut R,
) where
    S: ConversionService + ?Sized,
    O: BatchObserver + ?Sized,
    R: Rng + ?Sized,
{
    let options = *session.options();
    tracing::info!(
        items = session.items.len(),
        format = %options.format,
        quality = %options.quality,
        "batch started"
    );

    run_items(service, &mut session.items, &options, policy, observer, rng).await;

    let outcome = if session.items.is_empty() {
        BatchOutcome::NoSuccessfulItems
    } else {
        aggregate::aggregate(service, &session.items, policy.request_timeout).await
    };
    tracing::info!(
        done = session.done_count(),
        failed = session.failed_count(),
        outcome = ?outcome,
        "batch finished"
    );
    observer.on_outcome(&outcome);
    session.outcome = Some(outcome);
}

/// Builds a fresh session for `files` and runs it to completion.
pub async fn run_batch<S, O, R>(
    service: &S,
    files: Vec<SourceFile>,
    options: BatchOptions,
    policy: &RunPolicy,
    observer: &mut O,
    rng: &mut R,
) -> BatchSession
where
    S: ConversionService + ?Sized,
    O: BatchObserver + ?Sized,
    R: Rng + ?Sized,
{
    let mut session = BatchSession::new(files, options);
    run_session(service, &mut session, policy, observer, rng).await;
    session
}
