//! Emotes Core Library
//!
//! This crate provides the domain models, error types, configuration and input
//! validation shared by every emote catalog component.

pub mod config;
pub mod error;
pub mod models;
pub mod seed;
pub mod validation;

// Re-export commonly used types
pub use config::{parse_flag, BaseConfig, CatalogConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CacheSnapshot, CandidateEntry, EmoteCategory, QueryFilter, QueryResult, ValidatedAsset,
};
pub use validation::is_valid_asset_id;
