use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::EmoteCategory;

/// A candidate confirmed against the marketplace and enriched with its metadata.
///
/// `can_resell` is only ever true for assets that are for sale and not limited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedAsset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub creator_name: String,
    pub creator_type: String,
    pub is_for_sale: bool,
    pub can_resell: bool,
    pub asset_type: i64,
    pub category: EmoteCategory,
    pub last_validated_at: DateTime<Utc>,
}

impl ValidatedAsset {
    /// Same asset, re-labelled with the category of the candidate it came from.
    pub fn with_category(mut self, category: EmoteCategory) -> Self {
        self.category = category;
        self
    }
}
