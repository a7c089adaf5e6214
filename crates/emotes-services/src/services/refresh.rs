//! Batch refresh engine.

use emotes_core::{CandidateEntry, EmoteCategory, ValidatedAsset};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use super::marketplace::{AssetValidator, ValidationOutcome};

/// Counts from one refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub candidates: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub unavailable: usize,
    pub batches: usize,
}

impl RefreshReport {
    /// Every lookup failed at the transport level: the upstream is probably down.
    pub fn upstream_outage(&self) -> bool {
        self.candidates > 0 && self.unavailable == self.candidates
    }
}

/// Validates the whole candidate list in fixed-size batches.
///
/// Lookups inside a batch run concurrently and the batch completes only when all of
/// them have. Batches run one after another with `batch_delay` between them. The
/// delay is upstream courtesy only and never changes the result set.
#[derive(Clone)]
pub struct BatchRefresher {
    validator: Arc<dyn AssetValidator>,
    batch_size: usize,
    batch_delay: Duration,
}

impl BatchRefresher {
    pub fn new(validator: Arc<dyn AssetValidator>, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            validator,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    pub fn validator(&self) -> &Arc<dyn AssetValidator> {
        &self.validator
    }

    /// Run one full pass. Result order is unspecified.
    pub async fn refresh(&self, candidates: &[CandidateEntry]) -> (Vec<ValidatedAsset>, RefreshReport) {
        let mut assets = Vec::with_capacity(candidates.len());
        let mut report = RefreshReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        for (index, batch) in candidates.chunks(self.batch_size).enumerate() {
            if index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            // Owned ids keep the lookup futures 'static so a pass can run on a spawned task.
            let lookups: Vec<(String, EmoteCategory)> = batch
                .iter()
                .map(|candidate| (candidate.id.clone(), candidate.category))
                .collect();
            let outcomes: Vec<(EmoteCategory, ValidationOutcome)> = stream::iter(lookups)
                .map(|(id, category)| {
                    let validator = self.validator.clone();
                    async move {
                        let outcome = validator.validate(&id).await;
                        (category, outcome)
                    }
                })
                .buffer_unordered(batch.len())
                .collect()
                .await;

            for (category, outcome) in outcomes {
                match outcome {
                    ValidationOutcome::Accepted(asset) => {
                        report.accepted += 1;
                        assets.push(asset.with_category(category));
                    }
                    ValidationOutcome::Rejected(_) => report.rejected += 1,
                    ValidationOutcome::Unavailable(_) => report.unavailable += 1,
                }
            }
            report.batches += 1;
        }

        tracing::info!(
            candidates = report.candidates,
            accepted = report.accepted,
            rejected = report.rejected,
            unavailable = report.unavailable,
            batches = report.batches,
            "Refresh pass completed"
        );
        if report.upstream_outage() {
            tracing::warn!(
                candidates = report.candidates,
                "Every marketplace lookup failed; catalog will be empty until the next refresh"
            );
        }

        (assets, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    use crate::services::marketplace::RejectReason;

    fn emote(id: &str, can_resell: bool) -> ValidatedAsset {
        ValidatedAsset {
            id: id.to_string(),
            name: format!("Emote {}", id),
            description: String::new(),
            price: 100,
            creator_name: "Roblox".to_string(),
            creator_type: "Group".to_string(),
            is_for_sale: true,
            can_resell,
            asset_type: 61,
            category: EmoteCategory::Other,
            last_validated_at: Utc::now(),
        }
    }

    /// Accepts every id except those listed; records when each call started.
    struct ScriptedValidator {
        rejected: HashSet<String>,
        unavailable: HashSet<String>,
        latency: Duration,
        started: Mutex<Vec<(String, Instant)>>,
        calls: AtomicUsize,
    }

    impl ScriptedValidator {
        fn new(rejected: &[&str], unavailable: &[&str]) -> Self {
            Self {
                rejected: rejected.iter().map(|s| s.to_string()).collect(),
                unavailable: unavailable.iter().map(|s| s.to_string()).collect(),
                latency: Duration::ZERO,
                started: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }
    }

    #[async_trait]
    impl AssetValidator for ScriptedValidator {
        async fn validate(&self, id: &str) -> ValidationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started
                .lock()
                .unwrap()
                .push((id.to_string(), Instant::now()));
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.rejected.contains(id) {
                ValidationOutcome::Rejected(RejectReason::NotForSale)
            } else if self.unavailable.contains(id) {
                ValidationOutcome::Unavailable("timeout".to_string())
            } else {
                ValidationOutcome::Accepted(emote(id, true))
            }
        }
    }

    fn candidates(n: usize) -> Vec<CandidateEntry> {
        (1..=n)
            .map(|i| CandidateEntry::new(i.to_string(), format!("E{}", i), EmoteCategory::Dance))
            .collect()
    }

    #[tokio::test]
    async fn test_single_candidate_gets_category() {
        let validator = Arc::new(ScriptedValidator::new(&[], &[]));
        let refresher = BatchRefresher::new(validator, 5, Duration::ZERO);
        let seed = vec![CandidateEntry::new("1", "A", EmoteCategory::Dance)];

        let (assets, report) = refresher.refresh(&seed).await;

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].category, EmoteCategory::Dance);
        assert!(assets[0].can_resell);
        assert_eq!(report.accepted, 1);
    }

    #[tokio::test]
    async fn test_rejected_and_unavailable_are_dropped() {
        let validator = Arc::new(ScriptedValidator::new(&["2", "5"], &["3"]));
        let refresher = BatchRefresher::new(validator, 2, Duration::ZERO);

        let (assets, report) = refresher.refresh(&candidates(6)).await;

        let ids: HashSet<String> = assets.into_iter().map(|a| a.id).collect();
        let expected: HashSet<String> = ["1", "4", "6"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids, expected);
        assert_eq!(report.rejected, 2);
        assert_eq!(report.unavailable, 1);
        assert_eq!(report.batches, 3);
        assert!(!report.upstream_outage());
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_are_paced_without_trailing_delay() {
        let validator = Arc::new(ScriptedValidator::new(&[], &[]));
        let refresher = BatchRefresher::new(validator.clone(), 5, Duration::from_secs(1));
        let start = Instant::now();

        let (assets, report) = refresher.refresh(&candidates(12)).await;

        assert_eq!(assets.len(), 12);
        assert_eq!(report.batches, 3);
        // Two gaps between three batches, nothing after the last.
        assert_eq!(start.elapsed(), Duration::from_secs(2));

        let started = validator.started.lock().unwrap();
        let offsets: Vec<u64> = started
            .iter()
            .map(|(_, at)| at.duration_since(start).as_secs())
            .collect();
        assert_eq!(offsets.iter().filter(|&&s| s == 0).count(), 5);
        assert_eq!(offsets.iter().filter(|&&s| s == 1).count(), 5);
        assert_eq!(offsets.iter().filter(|&&s| s == 2).count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_within_a_batch_run_concurrently() {
        let validator =
            Arc::new(ScriptedValidator::new(&[], &[]).with_latency(Duration::from_secs(3)));
        let refresher = BatchRefresher::new(validator.clone(), 5, Duration::ZERO);
        let start = Instant::now();

        refresher.refresh(&candidates(5)).await;

        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_does_not_change_result_set() {
        let paced = BatchRefresher::new(
            Arc::new(ScriptedValidator::new(&["4"], &["7"])),
            3,
            Duration::from_secs(1),
        );
        let unpaced = BatchRefresher::new(
            Arc::new(ScriptedValidator::new(&["4"], &["7"])),
            3,
            Duration::ZERO,
        );

        let (a, _) = paced.refresh(&candidates(9)).await;
        let (b, _) = unpaced.refresh(&candidates(9)).await;

        let a: HashSet<String> = a.into_iter().map(|x| x.id).collect();
        let b: HashSet<String> = b.into_iter().map(|x| x.id).collect();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_pass_runs_on_spawned_task() {
        let validator = Arc::new(ScriptedValidator::new(&["2"], &[]));
        let refresher = BatchRefresher::new(validator, 2, Duration::ZERO);
        let seed = candidates(3);

        let (assets, report) = tokio::spawn(async move { refresher.refresh(&seed).await })
            .await
            .expect("refresh task panicked");

        assert_eq!(assets.len(), 2);
        assert!(assets.iter().all(|a| a.category == EmoteCategory::Dance));
        assert_eq!(report.batches, 2);
    }

    #[tokio::test]
    async fn test_all_unavailable_flags_outage() {
        let validator = Arc::new(ScriptedValidator::new(&[], &["1", "2"]));
        let refresher = BatchRefresher::new(validator, 5, Duration::ZERO);

        let (assets, report) = refresher.refresh(&candidates(2)).await;

        assert!(assets.is_empty());
        assert!(report.upstream_outage());
    }

    #[tokio::test]
    async fn test_empty_candidate_list() {
        let validator = Arc::new(ScriptedValidator::new(&[], &[]));
        let refresher = BatchRefresher::new(validator.clone(), 5, Duration::from_secs(1));

        let (assets, report) = refresher.refresh(&[]).await;

        assert!(assets.is_empty());
        assert_eq!(report, RefreshReport::default());
        assert!(!report.upstream_outage());
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }
}
