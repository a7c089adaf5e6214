//! Domain models for the emote catalog.

pub mod asset;
pub mod candidate;
pub mod query;
pub mod snapshot;

pub use asset::ValidatedAsset;
pub use candidate::{CandidateEntry, EmoteCategory};
pub use query::{QueryFilter, QueryResult};
pub use snapshot::CacheSnapshot;
