//! Service wiring and background tasks.

use crate::state::AppState;
use anyhow::{Context, Result};
use emotes_core::Config;
use emotes_infra::{spawn_sweeper, AdmissionLimiter};
use emotes_services::{AssetCache, MarketplaceValidator};
use std::sync::Arc;
use std::time::Duration;

/// Build the validator, cache and admission limiter from configuration.
pub fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let validator = MarketplaceValidator::new(config.marketplace_api_url(), config.upstream_timeout())
        .context("Failed to create marketplace validator")?;
    let cache = AssetCache::from_config(config, Arc::new(validator));

    let limiter = AdmissionLimiter::with_shards(
        config.http_rate_limit_per_minute(),
        config.rate_limit_window(),
        config.rate_limiter_shard_count(),
    );
    tracing::info!(
        limit = config.http_rate_limit_per_minute(),
        window_secs = config.rate_limit_window().as_secs(),
        shard_count = config.rate_limiter_shard_count(),
        "Admission limiting enabled"
    );

    Ok(Arc::new(AppState::new(config.clone(), cache, limiter)))
}

/// Start the limiter sweep and, if enabled, the cache warm-up.
pub fn spawn_background_tasks(config: &Config, state: &Arc<AppState>) {
    spawn_sweeper(
        state.limiter.clone(),
        Duration::from_secs(config.rate_limiter_sweep_interval_secs()),
    );

    if config.warm_cache_on_startup() {
        let cache = state.cache.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.warm_up().await {
                tracing::error!(error = %e, "Asset cache warm-up failed");
            }
        });
    } else {
        tracing::info!("Cache warm-up disabled; first request will populate the cache");
    }
}
