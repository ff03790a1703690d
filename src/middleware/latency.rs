//! Artificial request latency.
//!
//! Sleeps a random whole number of seconds so the duration histogram has
//! something to show. Turned off with `latency.enabled: false`.

use std::time::Duration;

use rand::Rng;

use crate::config::LatencyConfig;

/// Picks a delay in `[0, max_seconds)` whole seconds, or `None` when disabled.
pub fn pick_delay(config: &LatencyConfig) -> Option<Duration> {
    if !config.enabled || config.max_seconds == 0 {
        return None;
    }
    let secs = rand::rng().random_range(0..config.max_seconds);
    Some(Duration::from_secs(secs))
}

/// Suspends only the calling request's task.
pub async fn inject_latency(config: &LatencyConfig) {
    if let Some(delay) = pick_delay(config).filter(|d| !d.is_zero()) {
        tokio::time::sleep(delay).await;
    }
}
