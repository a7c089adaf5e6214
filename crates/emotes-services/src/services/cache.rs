//! Validated asset cache.
//!
//! Readers always see a complete [`CacheSnapshot`]. When the snapshot is stale
//! (older than the TTL, or empty) the reader that notices triggers a full refresh
//! and waits for it. Refreshes are single-flight: readers that observe the same
//! stale generation all wait on one pass and then read its result.
//!
//! The pass itself runs on a spawned task, so it finishes and publishes even if
//! every waiting request has gone away.

use chrono::{DateTime, Utc};
use emotes_core::{
    is_valid_asset_id, AppError, CacheSnapshot, CandidateEntry, Config, EmoteCategory,
    QueryFilter, QueryResult, ValidatedAsset,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::marketplace::{AssetValidator, ValidationOutcome};
use super::refresh::{BatchRefresher, RefreshReport};
use super::registry::CandidateRegistry;

const REJECTION_MESSAGE: &str = "Emote could not be validated as a purchasable emote";

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Already registered and present in the current snapshot.
    Known(ValidatedAsset),
    /// Already registered but absent from the snapshot (rejected on a prior refresh,
    /// or no refresh has completed yet).
    KnownUnvalidated,
    /// Newly validated, registered and appended to the snapshot.
    Accepted(ValidatedAsset),
}

/// Point-in-time counters for health reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub emote_count: usize,
    pub database_size: usize,
    pub last_cache_update: Option<DateTime<Utc>>,
    pub refresh_count: u64,
}

/// Snapshot plus the number of refresh passes that produced it. Read and written
/// together so a reader can tell whether a refresh landed after it looked.
#[derive(Clone)]
struct Published {
    generation: u64,
    snapshot: Arc<CacheSnapshot>,
}

struct CacheInner {
    published: RwLock<Published>,
    /// Held for the duration of a refresh pass.
    refresh_lock: Mutex<()>,
    /// Serializes snapshot appends from submissions against the refresh swap.
    submit_lock: Mutex<()>,
    registry: CandidateRegistry,
    refresher: BatchRefresher,
    ttl: Duration,
    default_limit: i64,
}

impl CacheInner {
    async fn current(&self) -> Published {
        self.published.read().await.clone()
    }

    /// Run a pass unless one has completed since `observed_generation` was read.
    async fn refresh_after(self: Arc<Self>, observed_generation: u64) -> Arc<CacheSnapshot> {
        let _refresh = self.refresh_lock.lock().await;

        let current = self.current().await;
        if current.generation != observed_generation {
            tracing::debug!(
                generation = current.generation,
                "Refresh already completed by another request"
            );
            return current.snapshot;
        }

        let candidates = self.registry.snapshot().await;
        let (assets, report) = self.refresher.refresh(&candidates).await;
        self.publish(&candidates, assets, report).await
    }

    async fn publish(
        &self,
        candidates: &[CandidateEntry],
        mut assets: Vec<ValidatedAsset>,
        report: RefreshReport,
    ) -> Arc<CacheSnapshot> {
        let _submit = self.submit_lock.lock().await;
        let mut published = self.published.write().await;

        // Submissions accepted while the pass was running are not in `candidates`.
        let refreshed_ids: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        let carried: Vec<ValidatedAsset> = published
            .snapshot
            .assets()
            .iter()
            .filter(|asset| !refreshed_ids.contains(asset.id.as_str()))
            .cloned()
            .collect();
        let carried_count = carried.len();
        assets.extend(carried);

        let snapshot = Arc::new(CacheSnapshot::build(assets));
        *published = Published {
            generation: published.generation + 1,
            snapshot: snapshot.clone(),
        };

        tracing::info!(
            generation = published.generation,
            cached = snapshot.len(),
            accepted = report.accepted,
            carried_over = carried_count,
            "Asset cache snapshot swapped"
        );
        snapshot
    }
}

/// Shared handle to the validated asset cache. Cloning is cheap.
#[derive(Clone)]
pub struct AssetCache {
    inner: Arc<CacheInner>,
}

impl AssetCache {
    pub fn new(
        registry: CandidateRegistry,
        refresher: BatchRefresher,
        ttl: Duration,
        default_limit: i64,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                published: RwLock::new(Published {
                    generation: 0,
                    snapshot: Arc::new(CacheSnapshot::empty()),
                }),
                refresh_lock: Mutex::new(()),
                submit_lock: Mutex::new(()),
                registry,
                refresher,
                ttl,
                default_limit,
            }),
        }
    }

    /// Seeded cache wired with the configured TTL, batching and default limit.
    pub fn from_config(config: &Config, validator: Arc<dyn AssetValidator>) -> Self {
        let refresher = BatchRefresher::new(
            validator,
            config.refresh_batch_size(),
            config.refresh_batch_delay(),
        );
        Self::new(
            CandidateRegistry::seeded(),
            refresher,
            config.cache_ttl(),
            config.default_query_limit(),
        )
    }

    pub fn registry(&self) -> &CandidateRegistry {
        &self.inner.registry
    }

    /// Filtered view of a fresh-enough snapshot, refreshing first if needed.
    pub async fn query(&self, filter: &QueryFilter) -> Result<QueryResult, AppError> {
        let snapshot = self.ensure_fresh().await?;
        Ok(snapshot.query(filter, self.inner.default_limit))
    }

    /// Current snapshot if fresh, otherwise the result of a (shared) refresh pass.
    pub async fn ensure_fresh(&self) -> Result<Arc<CacheSnapshot>, AppError> {
        let current = self.inner.current().await;
        if !current.snapshot.is_stale(self.inner.ttl) {
            return Ok(current.snapshot);
        }

        tracing::debug!(
            generation = current.generation,
            cached = current.snapshot.len(),
            "Asset cache stale, refreshing"
        );
        self.refresh_after(current.generation).await
    }

    /// Force a full pass regardless of staleness. Collapses with any pass already running.
    pub async fn refresh_now(&self) -> Result<Arc<CacheSnapshot>, AppError> {
        let generation = self.inner.current().await.generation;
        self.refresh_after(generation).await
    }

    /// Populate the cache ahead of the first reader.
    pub async fn warm_up(&self) -> Result<(), AppError> {
        let started = tokio::time::Instant::now();
        let snapshot = self.ensure_fresh().await?;
        tracing::info!(
            cached = snapshot.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Asset cache warmed up"
        );
        Ok(())
    }

    async fn refresh_after(&self, observed_generation: u64) -> Result<Arc<CacheSnapshot>, AppError> {
        let inner = self.inner.clone();
        tokio::spawn(inner.refresh_after(observed_generation))
            .await
            .map_err(|e| AppError::Internal(format!("Refresh task failed: {}", e)))
    }

    async fn known(&self, id: &str) -> Option<SubmissionOutcome> {
        if !self.inner.registry.contains(id).await {
            return None;
        }
        let current = self.inner.current().await;
        Some(match current.snapshot.get(id) {
            Some(asset) => SubmissionOutcome::Known(asset.clone()),
            None => SubmissionOutcome::KnownUnvalidated,
        })
    }

    /// Register a new candidate after validating it upstream.
    ///
    /// Known ids are answered from the registry and current snapshot without an
    /// upstream call. A newly accepted asset is appended to the current snapshot
    /// without resetting its build time.
    pub async fn submit_candidate(
        &self,
        id: &str,
        category: Option<&str>,
        submitted_by: &str,
    ) -> Result<SubmissionOutcome, AppError> {
        let id = id.trim();
        if !is_valid_asset_id(id) {
            return Err(AppError::InvalidInput("Invalid emote ID format".to_string()));
        }

        if let Some(outcome) = self.known(id).await {
            tracing::debug!(asset_id = %id, submitted_by = %submitted_by, "Submitted emote already known");
            return Ok(outcome);
        }

        let category = category
            .map(EmoteCategory::parse)
            .unwrap_or(EmoteCategory::Other);

        let asset = match self.inner.refresher.validator().validate(id).await {
            ValidationOutcome::Accepted(asset) => asset.with_category(category),
            ValidationOutcome::Rejected(reason) => {
                tracing::debug!(
                    asset_id = %id,
                    submitted_by = %submitted_by,
                    reason = %reason,
                    outcome = "rejected",
                    "Emote submission rejected"
                );
                return Err(AppError::ValidationRejected(REJECTION_MESSAGE.to_string()));
            }
            ValidationOutcome::Unavailable(reason) => {
                tracing::warn!(
                    asset_id = %id,
                    submitted_by = %submitted_by,
                    reason = %reason,
                    outcome = "unavailable",
                    "Emote submission could not be validated"
                );
                return Err(AppError::UpstreamUnavailable(reason));
            }
        };

        let _submit = self.inner.submit_lock.lock().await;

        // An identical submission may have won the race while we were validating.
        if let Some(outcome) = self.known(id).await {
            return Ok(outcome);
        }

        self.inner
            .registry
            .insert_if_absent(CandidateEntry::new(id, asset.name.clone(), category))
            .await;

        {
            let mut published = self.inner.published.write().await;
            let extended = published.snapshot.with_appended(asset.clone());
            published.snapshot = Arc::new(extended);
        }

        tracing::info!(
            asset_id = %id,
            name = %asset.name,
            category = %category,
            submitted_by = %submitted_by,
            "New emote submitted and validated"
        );
        Ok(SubmissionOutcome::Accepted(asset))
    }

    pub async fn stats(&self) -> CacheStats {
        let current = self.inner.current().await;
        CacheStats {
            emote_count: current.snapshot.len(),
            database_size: self.inner.registry.len().await,
            last_cache_update: current.snapshot.built_at(),
            refresh_count: current.generation,
        }
    }
}
