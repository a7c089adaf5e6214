//! Emotes Infrastructure Library
//!
//! Shared infrastructure used by the catalog API:
//! - Telemetry initialization (tracing subscriber)
//! - Per-client admission limiting

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-export commonly used types
#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{spawn_sweeper, AdmissionDecision, AdmissionLimiter};
