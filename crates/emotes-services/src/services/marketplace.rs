//! Upstream marketplace validation.
//!
//! A candidate id is looked up on the marketplace asset-details endpoint and
//! accepted only when it is an animation emote that is currently for sale. Every
//! failure degrades to "absent" for callers, but [`ValidationOutcome`] keeps
//! "not an emote" apart from "marketplace unreachable" so the two can be logged
//! and counted separately.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emotes_core::{EmoteCategory, ValidatedAsset};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Marketplace asset type id for animation emotes.
pub const EMOTE_ASSET_TYPE_ID: i64 = 61;

const DEFAULT_NAME: &str = "Unknown Emote";
const DEFAULT_CREATOR_NAME: &str = "Roblox";
const DEFAULT_CREATOR_TYPE: &str = "Group";

/// Why the marketplace answered but the asset was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NotFound,
    NotAnEmote { asset_type: Option<i64> },
    NotForSale,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotFound => f.write_str("asset not found"),
            RejectReason::NotAnEmote {
                asset_type: Some(asset_type),
            } => write!(f, "asset type {} is not an emote", asset_type),
            RejectReason::NotAnEmote { asset_type: None } => {
                f.write_str("asset type missing from marketplace response")
            }
            RejectReason::NotForSale => f.write_str("emote is not for sale"),
        }
    }
}

/// Result of validating one candidate id.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    Accepted(ValidatedAsset),
    Rejected(RejectReason),
    /// Timeout, transport error, throttling, 5xx or an undecodable body.
    Unavailable(String),
}

impl ValidationOutcome {
    /// Collapse to the external contract: an asset, or nothing.
    pub fn into_asset(self) -> Option<ValidatedAsset> {
        match self {
            ValidationOutcome::Accepted(asset) => Some(asset),
            ValidationOutcome::Rejected(_) | ValidationOutcome::Unavailable(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValidationOutcome::Accepted(_) => "accepted",
            ValidationOutcome::Rejected(_) => "rejected",
            ValidationOutcome::Unavailable(_) => "unavailable",
        }
    }
}

/// Stateless validator seam. Implementations must be safe to call concurrently.
#[async_trait]
pub trait AssetValidator: Send + Sync {
    /// Validate a numeric id. Callers are responsible for the id format.
    async fn validate(&self, id: &str) -> ValidationOutcome;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssetDetails {
    name: Option<String>,
    description: Option<String>,
    asset_type_id: Option<i64>,
    is_for_sale: Option<bool>,
    is_limited: Option<bool>,
    is_limited_unique: Option<bool>,
    price_in_robux: Option<i64>,
    creator: Option<CreatorDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreatorDetails {
    name: Option<String>,
    creator_type: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Apply the acceptance rule and map marketplace fields onto a [`ValidatedAsset`].
///
/// The returned asset carries [`EmoteCategory::Other`]; callers attach the
/// candidate's category.
fn evaluate(id: &str, details: AssetDetails, now: DateTime<Utc>) -> ValidationOutcome {
    if details.asset_type_id != Some(EMOTE_ASSET_TYPE_ID) {
        return ValidationOutcome::Rejected(RejectReason::NotAnEmote {
            asset_type: details.asset_type_id,
        });
    }

    let is_for_sale = details.is_for_sale.unwrap_or(false);
    if !is_for_sale {
        return ValidationOutcome::Rejected(RejectReason::NotForSale);
    }

    let limited = details.is_limited.unwrap_or(false) || details.is_limited_unique.unwrap_or(false);
    let (creator_name, creator_type) = match details.creator {
        Some(creator) => (non_blank(creator.name), non_blank(creator.creator_type)),
        None => (None, None),
    };

    ValidationOutcome::Accepted(ValidatedAsset {
        id: id.to_string(),
        name: non_blank(details.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        description: details.description.unwrap_or_default(),
        price: details
            .price_in_robux
            .and_then(|price| u64::try_from(price).ok())
            .unwrap_or(0),
        creator_name: creator_name.unwrap_or_else(|| DEFAULT_CREATOR_NAME.to_string()),
        creator_type: creator_type.unwrap_or_else(|| DEFAULT_CREATOR_TYPE.to_string()),
        is_for_sale,
        can_resell: is_for_sale && !limited,
        asset_type: EMOTE_ASSET_TYPE_ID,
        category: EmoteCategory::Other,
        last_validated_at: now,
    })
}

/// reqwest-backed validator for the marketplace asset-details endpoint.
#[derive(Clone)]
pub struct MarketplaceValidator {
    http_client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for MarketplaceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketplaceValidator")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MarketplaceValidator {
    /// `timeout` bounds each lookup end to end.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("emotes-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client for marketplace API")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn details_url(&self, id: &str) -> String {
        format!("{}/v2/assets/{}/details", self.base_url, id)
    }

    async fn fetch(&self, id: &str) -> ValidationOutcome {
        let response = match self
            .http_client
            .get(self.details_url(id))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return ValidationOutcome::Unavailable(format!("request timed out: {}", e))
            }
            Err(e) => return ValidationOutcome::Unavailable(format!("request failed: {}", e)),
        };

        let status = response.status();
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST) {
            return ValidationOutcome::Rejected(RejectReason::NotFound);
        }
        if !status.is_success() {
            return ValidationOutcome::Unavailable(format!("marketplace returned {}", status));
        }

        match response.json::<AssetDetails>().await {
            Ok(details) => evaluate(id, details, Utc::now()),
            Err(e) => ValidationOutcome::Unavailable(format!("undecodable response: {}", e)),
        }
    }
}

#[async_trait]
impl AssetValidator for MarketplaceValidator {
    async fn validate(&self, id: &str) -> ValidationOutcome {
        let outcome = self.fetch(id).await;
        match &outcome {
            ValidationOutcome::Accepted(asset) => {
                tracing::debug!(asset_id = %id, name = %asset.name, outcome = "accepted", "Emote validated");
            }
            ValidationOutcome::Rejected(reason) => {
                tracing::debug!(asset_id = %id, reason = %reason, outcome = "rejected", "Emote rejected by marketplace rules");
            }
            ValidationOutcome::Unavailable(reason) => {
                tracing::warn!(asset_id = %id, reason = %reason, outcome = "unavailable", "Marketplace lookup failed");
            }
        }
        outcome
    }
}
