//! Batch scheduler.
//!
//! Drives items through the conversion service one at a time:
//! queue → item runner (transport signals + estimator ticks) → aggregation.
//! Exactly one item is in flight; the next is dequeued only after the
//! previous one reached Done or Failed.

mod item;
mod policy;
mod queue;
mod run;

pub use policy::RunPolicy;
pub use queue::SequentialQueue;
pub use run::{run_batch, run_items, run_session};
