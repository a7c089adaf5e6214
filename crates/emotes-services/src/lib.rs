//! Emotes Services Layer
//!
//! This crate is the **business service layer**: upstream marketplace validation,
//! the batch refresh engine, the candidate registry and the validated asset cache.
//! Keep coordination here; keep thin HTTP handling in emotes-api.

pub mod services;

pub use services::cache::{AssetCache, CacheStats, SubmissionOutcome};
pub use services::marketplace::{
    AssetValidator, MarketplaceValidator, RejectReason, ValidationOutcome, EMOTE_ASSET_TYPE_ID,
};
pub use services::refresh::{BatchRefresher, RefreshReport};
pub use services::registry::CandidateRegistry;
