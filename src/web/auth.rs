// src/web/auth.rs
// Bearer token guard for API routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::SlugError;
use crate::web::state::AppState;

/// Reject requests without the configured site token. A no-op when no token
/// is configured.
pub async fn require_site_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, SlugError> {
    if let Some(expected) = state.site_token.as_deref() {
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        if provided != Some(expected) {
            debug!(path = %request.uri().path(), "Rejected request with missing or bad token");
            return Err(SlugError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}
