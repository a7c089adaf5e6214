//! API constants

/// API base path prefix. Everything under it is admission limited.
pub const API_BASE: &str = "/api";

pub const SERVICE_NAME: &str = "Emote Catalog API";

/// Crate version, reported by `/` and `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
