//! Health check.

use crate::constants::VERSION;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since startup.
    pub uptime: u64,
    /// Assets in the current snapshot.
    pub emote_count: usize,
    /// Registered candidates, validated or not.
    pub database_size: usize,
    pub last_cache_update: Option<DateTime<Utc>>,
    pub version: &'static str,
}

/// `GET /health`. Never triggers a refresh.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.cache.stats().await;

    Json(HealthResponse {
        status: "healthy",
        uptime: state.uptime_secs(),
        emote_count: stats.emote_count,
        database_size: stats.database_size,
        last_cache_update: stats.last_cache_update,
        version: VERSION,
    })
}
