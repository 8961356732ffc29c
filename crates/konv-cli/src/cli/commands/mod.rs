//! CLI command handlers, one file per command.

mod config;
mod convert;
mod stats;

pub use config::run_config;
pub use convert::{run_convert, ConvertArgs};
pub use stats::run_stats;
