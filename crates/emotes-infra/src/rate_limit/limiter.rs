use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// One client's fixed admission window.
#[derive(Debug, Clone)]
struct AdmissionWindow {
    count: u32,
    reset_at: Instant,
}

impl AdmissionWindow {
    fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 0,
            reset_at: now + window,
        }
    }

    fn check_and_increment(&mut self, now: Instant, limit: u32, window: Duration) -> bool {
        // First request after expiry opens a fresh window
        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + window;
        }

        if self.count < limit {
            self.count += 1;
            true
        } else {
            false
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_at
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Allowed { remaining: u32 },
    Rejected { retry_after: Duration },
}

impl AdmissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AdmissionDecision::Allowed { .. })
    }
}

/// Sharded fixed-window admission limiter keyed by client identity.
///
/// Each client may make `limit` requests per window. The window opens on the first
/// request (or the first after expiry) and is never shortened by rejections. Keys
/// are hashed onto independent mutex-guarded shards to keep lock contention low.
#[derive(Clone)]
pub struct AdmissionLimiter {
    shards: Vec<Arc<Mutex<HashMap<String, AdmissionWindow>>>>,
    limit: u32,
    window: Duration,
}

impl AdmissionLimiter {
    /// Create a limiter with the default shard count (16 shards)
    pub fn new(limit: u32, window: Duration) -> Self {
        Self::with_shards(limit, window, 16)
    }

    pub fn with_shards(limit: u32, window: Duration, shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            limit,
            window,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Count one request from `client_id` and decide whether it is admitted.
    pub async fn admit(&self, client_id: &str) -> AdmissionDecision {
        let now = Instant::now();
        let shard = &self.shards[self.shard_index(client_id)];
        let mut windows = shard.lock().await;

        let window = windows
            .entry(client_id.to_string())
            .or_insert_with(|| AdmissionWindow::open(now, self.window));

        if window.check_and_increment(now, self.limit, self.window) {
            AdmissionDecision::Allowed {
                remaining: self.limit.saturating_sub(window.count),
            }
        } else {
            AdmissionDecision::Rejected {
                retry_after: window.reset_at.saturating_duration_since(now),
            }
        }
    }

    /// Drop windows that have already expired. Returns how many were removed.
    ///
    /// An expired window is indistinguishable from an absent one on the next
    /// request, so sweeping never changes an admission decision.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        for shard in &self.shards {
            let mut windows = shard.lock().await;
            let before = windows.len();
            windows.retain(|_, window| !window.is_expired(now));
            removed += before - windows.len();
        }

        if removed > 0 {
            tracing::debug!(
                windows_removed = removed,
                "Swept expired admission windows"
            );
        }
        removed
    }

    /// Number of clients currently tracked across all shards.
    pub async fn tracked_clients(&self) -> usize {
        let mut total = 0;
        for shard in &self.shards {
            total += shard.lock().await.len();
        }
        total
    }
}
