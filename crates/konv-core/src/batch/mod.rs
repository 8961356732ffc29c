//! Batch data model: items, their lifecycle, and the session that owns them.

mod item;
mod session;

pub use item::{Item, ItemStatus};
pub use session::{BatchOutcome, BatchSession};
