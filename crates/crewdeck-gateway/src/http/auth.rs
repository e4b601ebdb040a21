use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::error::ApiError;
use crate::app::AppState;

/// Bearer-token gate for `/api/crew*` and `/api/schedule*`.
///
/// On success the verified [`crewdeck_access::Claims`] ride along in the
/// request extensions for the handler's capability check.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let claims = state.access.authenticate(header).map_err(|e| {
        debug!(path = %request.uri().path(), error = %e, "request rejected");
        ApiError::from(e)
    })?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
