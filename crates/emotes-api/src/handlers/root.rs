use crate::constants::{SERVICE_NAME, VERSION};
use axum::Json;
use serde_json::{json, Value};

/// `GET /`: static service description.
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": VERSION,
        "endpoints": {
            "GET /api/emotes": "List validated emotes (query: category, limit, resellable_only)",
            "POST /api/submit-emote": "Submit an emote id for validation (body: emoteId, submittedBy?, category?)",
            "GET /health": "Service health and cache statistics",
        },
    }))
}
