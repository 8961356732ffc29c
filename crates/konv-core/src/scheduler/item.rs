//! Run one item to a terminal status.
//!
//! Two event sources feed the item: upload signals from the transport and
//! estimator ticks. The convert future resolving is the only terminal signal;
//! once it is applied the signal channel is dropped and ticks stop.

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::policy::RunPolicy;
use crate::batch::{Item, ItemStatus};
use crate::estimator::ProgressEstimator;
use crate::events::BatchObserver;
use crate::options::BatchOptions;
use crate::service::{ConversionService, ServiceError, UploadSignal};

pub(super) async fn run_item<S, O, R>(
    service: &S,
    item: &mut Item,
    options: &BatchOptions,
    policy: &RunPolicy,
    observer: &mut O,
    rng: &mut R,
) where
    S: ConversionService + ?Sized,
    O: BatchObserver + ?Sized,
    R: Rng + ?Sized,
{
    if !item.begin_upload() {
        return;
    }
    tracing::debug!(index = item.index(), file = %item.file().name, "uploading");
    observer.on_item(&item.event());

    let mut estimator = ProgressEstimator::new(policy.estimator);
    let (signals_tx, mut signals) = mpsc::unbounded_channel();
    let file = item.file().clone();
    let convert = time::timeout(
        policy.request_timeout,
        service.convert(&file, options, signals_tx),
    );
    tokio::pin!(convert);

    let mut ticker = time::interval_at(Instant::now() + policy.tick_interval, policy.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut signals_open = true;

    // `biased`: signals queued before the response are applied first.
    let result = loop {
        tokio::select! {
            biased;
            signal = signals.recv(), if signals_open => match signal {
                Some(UploadSignal::Progress { sent, total }) => {
                    if let Some(pct) = estimator.observe_upload(sent, total) {
                        if item.set_progress(pct) {
                            observer.on_item(&item.event());
                        }
                    }
                }
                Some(UploadSignal::Sent) => {
                    if enter_converting(item, &mut estimator, observer) {
                        ticker.reset();
                    }
                }
                None => signals_open = false,
            },
            result = &mut convert => break result,
            _ = ticker.tick(), if item.status() == ItemStatus::Converting => {
                if let Some(pct) = estimator.tick(rng) {
                    if item.set_progress(pct) {
                        observer.on_item(&item.event());
                    }
                }
            }
        }
    };
    drop(signals);

    let result = result.unwrap_or_else(|_| Err(ServiceError::timed_out(policy.request_timeout)));
    match result {
        Ok(url) => {
            // A response means the body was sent, even if no signal said so.
            enter_converting(item, &mut estimator, observer);
            estimator.finish(true);
            if item.complete(url) {
                tracing::debug!(index = item.index(), url = item.download_url().unwrap_or_default(), "done");
                observer.on_item(&item.event());
            }
        }
        Err(error) => {
            estimator.finish(false);
            tracing::warn!(
                index = item.index(),
                file = %item.file().name,
                cause = error.cause(),
                error = %error,
                "item failed"
            );
            if item.fail(error) {
                observer.on_item(&item.event());
            }
        }
    }
}

/// Uploading → Converting, restarting progress at the estimator seed. Returns
/// true if the transition happened.
fn enter_converting<O>(item: &mut Item, estimator: &mut ProgressEstimator, observer: &mut O) -> bool
where
    O: BatchObserver + ?Sized,
{
    if item.status() != ItemStatus::Uploading {
        return false;
    }
    let seed = estimator.start_converting();
    item.begin_converting(seed);
    tracing::debug!(index = item.index(), "upload sent, converting");
    observer.on_item(&item.event());
    true
}
