//! Application state shared by handlers and middleware.

use emotes_core::Config;
use emotes_infra::AdmissionLimiter;
use emotes_services::AssetCache;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cache: AssetCache,
    pub limiter: AdmissionLimiter,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, cache: AssetCache, limiter: AdmissionLimiter) -> Self {
        Self {
            config,
            cache,
            limiter,
            started_at: Instant::now(),
        }
    }

    /// Whole seconds since the state was created.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
