use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::observability::metrics;

/// Reject requests whose shared-secret header does not match the configured token.
///
/// An empty `auth_token` turns the check off.
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let config = state.store.snapshot();
    if !config.auth_enabled() {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(config.auth_header.as_str())
        .and_then(|h| h.to_str().ok());

    if presented == Some(config.auth_token.as_str()) {
        return Ok(next.run(request).await);
    }

    metrics::record_auth_rejection();
    tracing::warn!(path = %request.uri().path(), "Rejected request with missing or wrong secret");
    Err(StatusCode::UNAUTHORIZED)
}
