use crate::error::render;
use crate::state::AppState;
use crate::utils::ip_extraction::extract_client_ip;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use emotes_core::AppError;
use emotes_infra::AdmissionDecision;
use std::net::SocketAddr;
use std::sync::Arc;

fn set_header(headers: &mut HeaderMap, name: &'static str, value: impl ToString) {
    if let Ok(header_value) = HeaderValue::from_str(&value.to_string()) {
        headers.insert(name, header_value);
    }
}

/// Per-IP admission limiting for the `/api` routes.
///
/// # Headers
/// - `X-RateLimit-Limit`: requests allowed per window
/// - `X-RateLimit-Remaining`: requests left in the current window
/// - `Retry-After`: seconds until the window resets (429 responses only, at least 1)
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = extract_client_ip(
        request.headers(),
        peer,
        state.config.trusted_proxy_count(),
    );
    let limit = state.limiter.limit();

    match state.limiter.admit(&client_ip).await {
        AdmissionDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            set_header(response.headers_mut(), "X-RateLimit-Limit", limit);
            set_header(response.headers_mut(), "X-RateLimit-Remaining", remaining);
            response
        }
        AdmissionDecision::Rejected { retry_after } => {
            let retry_after_secs = retry_after.as_secs().max(1);
            tracing::warn!(
                client_ip = %client_ip,
                path = %request.uri().path(),
                limit,
                retry_after_secs,
                "Admission limit exceeded"
            );

            // Logged above with client context; render without a second log line.
            let mut response = render(&AppError::RateLimited { retry_after_secs });
            set_header(response.headers_mut(), "X-RateLimit-Limit", limit);
            set_header(response.headers_mut(), "X-RateLimit-Remaining", 0);
            set_header(response.headers_mut(), "Retry-After", retry_after_secs);
            response
        }
    }
}
