//! Input validation for client-supplied identifiers.

use regex::Regex;
use std::sync::OnceLock;

/// Longest id accepted from clients; marketplace ids fit comfortably in a u64.
pub const MAX_ASSET_ID_LENGTH: usize = 20;

fn asset_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("static asset id pattern is valid"))
}

/// True when `id` is a non-empty run of ASCII digits.
pub fn is_valid_asset_id(id: &str) -> bool {
    id.len() <= MAX_ASSET_ID_LENGTH && asset_id_pattern().is_match(id)
}
