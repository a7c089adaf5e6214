use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

use super::asset::ValidatedAsset;
use super::query::{QueryFilter, QueryResult};

/// The complete result of one refresh pass.
///
/// Snapshots are never mutated in place: a submission produces a new snapshot via
/// [`CacheSnapshot::with_appended`], keeping the build timestamps of the original.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    assets: Vec<ValidatedAsset>,
    built_at: Option<DateTime<Utc>>,
    refreshed_at: Option<Instant>,
}

impl CacheSnapshot {
    /// Placeholder held before the first refresh completes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stamp a freshly assembled asset set with the current time.
    pub fn build(assets: Vec<ValidatedAsset>) -> Self {
        Self {
            assets,
            built_at: Some(Utc::now()),
            refreshed_at: Some(Instant::now()),
        }
    }

    pub fn with_appended(&self, asset: ValidatedAsset) -> Self {
        let mut assets = Vec::with_capacity(self.assets.len() + 1);
        assets.extend(self.assets.iter().cloned());
        assets.push(asset);
        Self {
            assets,
            built_at: self.built_at,
            refreshed_at: self.refreshed_at,
        }
    }

    pub fn assets(&self) -> &[ValidatedAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn get(&self, id: &str) -> Option<&ValidatedAsset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    /// Stale when never built, empty, or strictly older than `ttl`.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        match self.refreshed_at {
            None => true,
            Some(_) if self.assets.is_empty() => true,
            Some(at) => at.elapsed() > ttl,
        }
    }

    /// Filter in the fixed order category -> resellable -> limit.
    pub fn query(&self, filter: &QueryFilter, default_limit: i64) -> QueryResult {
        let limit = filter.limit.unwrap_or(default_limit);
        let take = usize::try_from(limit).unwrap_or(0);

        let assets: Vec<ValidatedAsset> = self
            .assets
            .iter()
            .filter(|asset| match filter.category.as_deref() {
                Some(category) => asset.category.matches(category),
                None => true,
            })
            .filter(|asset| !filter.resellable_only || asset.can_resell)
            .take(take)
            .cloned()
            .collect();

        QueryResult {
            total: assets.len(),
            assets,
            cached: self.assets.len(),
            last_updated: self.built_at,
        }
    }
}
