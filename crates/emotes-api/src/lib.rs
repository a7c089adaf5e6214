//! Emotes API Library
//!
//! This crate provides the HTTP handlers, middleware and application setup for the
//! emote catalog service.

pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod setup;
pub mod state;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
