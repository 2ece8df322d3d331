//! Quote-tweet airdrop registration.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use parakeet_core::models::airdrop::ACTIVE_AIRDROPS_KEY;
use parakeet_core::models::{ActiveAirdrop, ActiveAirdrops, AirdropRegistration};
use parakeet_core::AppError;
use parakeet_infra::cache_key;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AirdropResponse {
    pub message: String,
    pub tweet_id: String,
}

#[utoipa::path(
    post,
    path = "/api/bot/airdrop",
    tag = "bot",
    request_body = AirdropRegistration,
    responses(
        (status = 200, description = "Airdrop registered", body = AirdropResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
    )
)]
pub async fn register_airdrop(
    State(state): State<Arc<AppState>>,
    ValidatedJson(registration): ValidatedJson<AirdropRegistration>,
) -> Result<Json<AirdropResponse>, HttpAppError> {
    let key = cache_key(ACTIVE_AIRDROPS_KEY);
    let mut airdrops: ActiveAirdrops = match state.cache.get(&key).await {
        Some(raw) => serde_json::from_str(&raw).map_err(AppError::from)?,
        None => ActiveAirdrops::new(),
    };

    let tweet_id = registration.tweet_id.clone();
    airdrops.insert(tweet_id.clone(), ActiveAirdrop::new(registration));
    state
        .cache
        .set(&key, serde_json::to_string(&airdrops).map_err(AppError::from)?)
        .await;

    tracing::info!(tweet_id = %tweet_id, "airdrop registered");
    Ok(Json(AirdropResponse {
        message: "airdrop registered".to_string(),
        tweet_id,
    }))
}
