//! Request middleware.

use std::sync::Arc;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use subtle::ConstantTimeEq;

use parakeet_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

const SERVICE_KEY_HEADER: &str = "x-api-key";

/// Require the configured service API key on mutating endpoints. A no-op
/// when no key is configured (development).
pub async fn require_service_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, HttpAppError> {
    let Some(expected) = &state.config.base.service_api_key else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(SERVICE_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let matches: bool = provided.as_bytes().ct_eq(expected.as_bytes()).into();
    if !matches {
        return Err(AppError::Unauthorized("invalid or missing service API key".to_string()).into());
    }
    Ok(next.run(request).await)
}
