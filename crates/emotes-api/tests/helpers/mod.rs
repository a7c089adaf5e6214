//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p emotes-api`. No network access is needed;
//! the marketplace is replaced by [`StubValidator`].

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use emotes_api::setup::routes;
use emotes_api::AppState;
use emotes_core::{CandidateEntry, CatalogConfig, Config, EmoteCategory, ValidatedAsset};
use emotes_infra::AdmissionLimiter;
use emotes_services::{
    AssetCache, AssetValidator, BatchRefresher, CandidateRegistry, RejectReason,
    ValidationOutcome, EMOTE_ASSET_TYPE_ID,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-process marketplace: accepts every id unless told otherwise.
#[derive(Default)]
pub struct StubValidator {
    not_for_sale: HashSet<String>,
    unavailable: HashSet<String>,
    limited: HashSet<String>,
    calls: AtomicUsize,
}

impl StubValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_for_sale(mut self, ids: &[&str]) -> Self {
        self.not_for_sale.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn unavailable(mut self, ids: &[&str]) -> Self {
        self.unavailable.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn limited(mut self, ids: &[&str]) -> Self {
        self.limited.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetValidator for StubValidator {
    async fn validate(&self, id: &str) -> ValidationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.contains(id) {
            return ValidationOutcome::Unavailable("marketplace returned 503".to_string());
        }
        if self.not_for_sale.contains(id) {
            return ValidationOutcome::Rejected(RejectReason::NotForSale);
        }
        ValidationOutcome::Accepted(ValidatedAsset {
            id: id.to_string(),
            name: format!("Emote {}", id),
            description: "Stub emote".to_string(),
            price: 100,
            creator_name: "Roblox".to_string(),
            creator_type: "User".to_string(),
            is_for_sale: true,
            can_resell: !self.limited.contains(id),
            asset_type: EMOTE_ASSET_TYPE_ID,
            category: EmoteCategory::Other,
            last_validated_at: Utc::now(),
        })
    }
}

/// Defaults with unpaced refreshes so tests do not sleep.
pub fn test_config() -> CatalogConfig {
    let mut catalog = CatalogConfig::default();
    catalog.refresh_batch_delay_ms = 0;
    catalog.warm_cache_on_startup = false;
    catalog
}

pub fn seed(id: &str, name: &str, category: EmoteCategory) -> CandidateEntry {
    CandidateEntry::new(id, name, category)
}

/// Four dance emotes (one limited), one funny, one gesture that is not for sale.
pub fn default_seeds() -> Vec<CandidateEntry> {
    vec![
        seed("101", "Robot", EmoteCategory::Dance),
        seed("102", "Twirl", EmoteCategory::Dance),
        seed("103", "Floss", EmoteCategory::Dance),
        seed("104", "Dolphin", EmoteCategory::Dance),
        seed("201", "Sleep", EmoteCategory::Funny),
        seed("301", "Salute", EmoteCategory::Gesture),
    ]
}

pub fn default_validator() -> StubValidator {
    StubValidator::new().limited(&["104"]).not_for_sale(&["301"])
}

/// Test application: server plus handles for inspecting state.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub validator: Arc<StubValidator>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config(), default_validator(), default_seeds())
}

pub fn setup_test_app_with(
    catalog: CatalogConfig,
    validator: StubValidator,
    seeds: Vec<CandidateEntry>,
) -> TestApp {
    let config = Config(Box::new(catalog));
    let validator = Arc::new(validator);

    let refresher = BatchRefresher::new(
        validator.clone(),
        config.refresh_batch_size(),
        config.refresh_batch_delay(),
    );
    let cache = AssetCache::new(
        CandidateRegistry::new(seeds),
        refresher,
        config.cache_ttl(),
        config.default_query_limit(),
    );
    let limiter = AdmissionLimiter::with_shards(
        config.http_rate_limit_per_minute(),
        config.rate_limit_window(),
        config.rate_limiter_shard_count(),
    );
    let state = Arc::new(AppState::new(config.clone(), cache, limiter));

    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        validator,
    }
}
