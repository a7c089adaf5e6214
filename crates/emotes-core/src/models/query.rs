use chrono::{DateTime, Utc};
use serde::Serialize;

use super::asset::ValidatedAsset;

/// Read-side filter. Applied in order: category, resellable-only, limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub category: Option<String>,
    /// `None` means the configured default; zero or negative yields nothing.
    pub limit: Option<i64>,
    pub resellable_only: bool,
}

/// Result of a cache query plus the metadata clients display alongside it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub assets: Vec<ValidatedAsset>,
    /// Number of assets returned after filtering.
    pub total: usize,
    /// Number of assets in the current snapshot.
    pub cached: usize,
    pub last_updated: Option<DateTime<Utc>>,
}
