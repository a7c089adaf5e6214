//! Catalog listing.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use emotes_core::{parse_flag, ErrorMetadata, QueryFilter, ValidatedAsset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Raw query string. Values are parsed leniently: a malformed `limit` falls back
/// to the default rather than failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct EmoteListParams {
    pub category: Option<String>,
    pub limit: Option<String>,
    pub resellable_only: Option<String>,
}

impl EmoteListParams {
    fn to_filter(&self) -> QueryFilter {
        QueryFilter {
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            limit: self
                .limit
                .as_deref()
                .and_then(|limit| limit.trim().parse::<i64>().ok()),
            resellable_only: self.resellable_only.as_deref().is_some_and(is_truthy),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    parse_flag(value).unwrap_or(false)
}

#[derive(Debug, Serialize)]
pub struct FiltersApplied {
    pub category: Option<String>,
    pub limit: i64,
    pub resellable_only: bool,
}

#[derive(Debug, Serialize)]
pub struct EmoteListResponse {
    pub success: bool,
    pub emotes: Vec<ValidatedAsset>,
    pub total: usize,
    pub cached: usize,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
    pub filters_applied: FiltersApplied,
}

/// `GET /api/emotes`
pub async fn list_emotes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EmoteListParams>,
) -> Response {
    let filter = params.to_filter();

    match state.cache.query(&filter).await {
        Ok(result) => {
            let filters_applied = FiltersApplied {
                limit: filter
                    .limit
                    .unwrap_or_else(|| state.config.default_query_limit()),
                category: filter.category,
                resellable_only: filter.resellable_only,
            };
            Json(EmoteListResponse {
                success: true,
                emotes: result.assets,
                total: result.total,
                cached: result.cached,
                last_updated: result.last_updated,
                filters_applied,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serve emote catalog");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Failed to fetch emotes",
                    "emotes": [],
                    "message": e.client_message(),
                })),
            )
                .into_response()
        }
    }
}
