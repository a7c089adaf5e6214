//! Candidate submission.

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use emotes_core::{AppError, ValidatedAsset};
use emotes_services::SubmissionOutcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ANONYMOUS: &str = "anonymous";

/// Clients send the id either as a JSON string or a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EmoteIdInput {
    Text(String),
    Number(u64),
}

impl EmoteIdInput {
    fn into_string(self) -> String {
        match self {
            EmoteIdInput::Text(text) => text,
            EmoteIdInput::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEmoteRequest {
    pub emote_id: Option<EmoteIdInput>,
    pub submitted_by: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitEmoteResponse {
    pub success: bool,
    pub message: &'static str,
    pub emote: Option<ValidatedAsset>,
}

/// `POST /api/submit-emote`
pub async fn submit_emote(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SubmitEmoteRequest>,
) -> Result<Json<SubmitEmoteResponse>, HttpAppError> {
    let emote_id = request
        .emote_id
        .map(EmoteIdInput::into_string)
        .ok_or_else(|| AppError::InvalidInput("Invalid emote ID format".to_string()))?;
    let submitted_by = request
        .submitted_by
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS);

    let outcome = state
        .cache
        .submit_candidate(&emote_id, request.category.as_deref(), submitted_by)
        .await?;

    let (message, emote) = match outcome {
        SubmissionOutcome::Accepted(asset) => ("Emote validated and added successfully", Some(asset)),
        SubmissionOutcome::Known(asset) => ("Emote already exists in database", Some(asset)),
        SubmissionOutcome::KnownUnvalidated => (
            "Emote already exists in database but is not currently available",
            None,
        ),
    };

    Ok(Json(SubmitEmoteResponse {
        success: true,
        message,
        emote,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emote_id_accepts_string_or_number() {
        let request: SubmitEmoteRequest =
            serde_json::from_str(r#"{"emoteId": 3360689775}"#).unwrap();
        assert_eq!(request.emote_id.unwrap().into_string(), "3360689775");

        let request: SubmitEmoteRequest =
            serde_json::from_str(r#"{"emoteId": "42", "submittedBy": "builder", "category": "Dance"}"#)
                .unwrap();
        assert_eq!(request.emote_id.unwrap().into_string(), "42");
        assert_eq!(request.submitted_by.as_deref(), Some("builder"));
    }

    #[test]
    fn test_missing_emote_id_parses() {
        let request: SubmitEmoteRequest = serde_json::from_str("{}").unwrap();
        assert!(request.emote_id.is_none());
    }
}
