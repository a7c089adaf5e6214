//! Per-client admission limiting.

mod limiter;

pub use limiter::{AdmissionDecision, AdmissionLimiter};

use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn the periodic sweep of expired admission windows.
///
/// Returns `None` when `interval` is zero (sweeping disabled).
pub fn spawn_sweeper(limiter: AdmissionLimiter, interval: Duration) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        tracing::info!("Admission window sweeping disabled");
        return None;
    }

    tracing::info!(
        interval_secs = interval.as_secs(),
        "Starting admission window sweeper"
    );
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; nothing to sweep yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.sweep_expired().await;
        }
    }))
}
