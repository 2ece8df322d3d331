//! Health check handlers.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::state::AppState;

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check(_state: axum::extract::State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the cache answers a round trip.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready"),
        (status = 503, description = "Cache unavailable"),
    )
)]
pub async fn readiness_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl IntoResponse {
    let probe_key = "health-check-probe";
    state.cache.set(probe_key, "ok".to_string()).await;
    let ready = state.cache.get(probe_key).await.as_deref() == Some("ok");
    state.cache.delete(probe_key).await;

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "cache": if ready { "ready" } else { "not_ready" },
        })),
    )
}

/// Full health check: cache plus the state of every capability lane.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service health including per-lane state"))
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl IntoResponse {
    let lanes = state.lanes.statuses();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "lanes": lanes,
        })),
    )
}
