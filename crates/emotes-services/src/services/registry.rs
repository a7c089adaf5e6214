//! Candidate registry: the append-only list of ids the refresh engine validates.

use emotes_core::seed::seed_candidates;
use emotes_core::CandidateEntry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct RegistryState {
    entries: Vec<CandidateEntry>,
    index: HashMap<String, usize>,
}

impl RegistryState {
    fn insert_if_absent(&mut self, entry: CandidateEntry) -> bool {
        if self.index.contains_key(&entry.id) {
            return false;
        }
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }
}

/// Insertion-ordered set of candidates keyed by id. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl CandidateRegistry {
    pub fn new(entries: impl IntoIterator<Item = CandidateEntry>) -> Self {
        let mut state = RegistryState::default();
        for entry in entries {
            state.insert_if_absent(entry);
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Registry preloaded with the built-in seed catalog.
    pub fn seeded() -> Self {
        Self::new(seed_candidates())
    }

    /// Copy of all entries in insertion order.
    pub async fn snapshot(&self) -> Vec<CandidateEntry> {
        self.state.read().await.entries.clone()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.state.read().await.index.contains_key(id)
    }

    pub async fn get(&self, id: &str) -> Option<CandidateEntry> {
        let state = self.state.read().await;
        state.index.get(id).map(|&i| state.entries[i].clone())
    }

    /// Append `entry` unless its id is already registered. Returns whether it was added.
    pub async fn insert_if_absent(&self, entry: CandidateEntry) -> bool {
        self.state.write().await.insert_if_absent(entry)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
