//! `konv stats` – read the service's conversion counter.

use anyhow::{Context, Result};
use konv_core::config::KonvConfig;
use konv_core::service::CurlService;
use std::time::Duration;

const WATCH_INTERVAL: Duration = Duration::from_secs(2);

pub async fn run_stats(cfg: &KonvConfig, watch: bool) -> Result<()> {
    let service = CurlService::from_config(cfg)?;
    if !watch {
        let total = service
            .stats()
            .await
            .with_context(|| format!("fetch stats from {}", service.base_url()))?;
        println!("Total conversions: {}", total);
        return Ok(());
    }

    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    let mut last: Option<u64> = None;
    loop {
        ticker.tick().await;
        // A failed poll keeps the last shown value; the next tick retries.
        match service.stats().await {
            Ok(total) if last != Some(total) => {
                println!("Total conversions: {}", total);
                last = Some(total);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("stats poll failed: {}", e),
        }
    }
}
