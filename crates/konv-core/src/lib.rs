pub mod config;
pub mod logging;

pub mod aggregate;
pub mod batch;
pub mod estimator;
pub mod events;
pub mod options;
pub mod scheduler;
pub mod service;
pub mod source;
pub mod url_model;

#[cfg(test)]
mod testing;
