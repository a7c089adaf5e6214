use crate::error::ErrorDetail;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Error detail middleware
///
/// Outside production, replaces error bodies with the variant that carries the
/// internal `message`. In production the detail is dropped unseen.
pub async fn error_detail_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetail(detailed)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if state.config.is_production() {
        return response;
    }

    let (parts, _) = response.into_parts();
    let body = Json(detailed).into_response().into_body();
    Response::from_parts(parts, body)
}
