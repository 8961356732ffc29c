//! Timing parameters for a batch run.

use std::time::Duration;

use crate::config::KonvConfig;
use crate::estimator::EstimatorConfig;

/// Bounds and tick rates applied to every item of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunPolicy {
    /// Upper bound on one convert (or bundle) request; exceeding it fails the item.
    pub request_timeout: Duration,
    /// Interval between simulated progress steps while converting.
    pub tick_interval: Duration,
    pub estimator: EstimatorConfig,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(600),
            tick_interval: Duration::from_millis(300),
            estimator: EstimatorConfig::default(),
        }
    }
}

impl RunPolicy {
    pub fn from_config(cfg: &KonvConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(cfg.request_timeout_secs.max(1)),
            tick_interval: Duration::from_millis(cfg.estimator_tick_ms.max(10)),
            estimator: cfg.estimator.unwrap_or_default(),
        }
    }
}
