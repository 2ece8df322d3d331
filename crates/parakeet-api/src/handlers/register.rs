//! Bot registration: install platform adapters, register extra agent kits,
//! and seed every enabled capability lane.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use parakeet_core::models::{HotProfileJob, MentionJob, RegisterRequest};
use parakeet_services::{AlexaAdapter, DiscordAdapter, SlackAdapter};

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

/// Initialize the chat platform adapters named in the registration. Each
/// adapter fails in isolation: a broken Slack config must not take down
/// Discord or any of the lanes.
async fn install_platform_adapters(state: &AppState, details: &parakeet_core::RegisterDetails) {
    let Some(platforms) = &details.platforms else {
        return;
    };
    let mut adapters = state.adapters.write().await;

    if let Some(slack_config) = &platforms.slack {
        match SlackAdapter::new(slack_config, state.llm.clone(), state.config.http_timeout) {
            Ok(adapter) => match adapter.init().await {
                Ok(()) => {
                    tracing::info!("Slack adapter initialized");
                    adapters.slack = Some(Arc::new(adapter));
                }
                Err(err) => tracing::error!(error = %err, "Failed to initialize Slack adapter"),
            },
            Err(err) => tracing::error!(error = %err, "Failed to configure Slack adapter"),
        }
    }

    if let Some(discord_config) = &platforms.discord {
        match DiscordAdapter::new(discord_config, state.llm.clone(), state.config.http_timeout) {
            Ok(adapter) => match adapter.init().await {
                Ok(()) => {
                    tracing::info!("Discord adapter initialized");
                    adapters.discord = Some(Arc::new(adapter));
                }
                Err(err) => tracing::error!(error = %err, "Failed to initialize Discord adapter"),
            },
            Err(err) => tracing::error!(error = %err, "Failed to configure Discord adapter"),
        }
    }

    if let Some(alexa_config) = &platforms.alexa {
        match AlexaAdapter::new(alexa_config, state.llm.clone()) {
            Ok(adapter) => match adapter.init().await {
                Ok(()) => {
                    tracing::info!("Alexa adapter initialized");
                    adapters.alexa = Some(Arc::new(adapter));
                }
                Err(err) => tracing::error!(error = %err, "Failed to initialize Alexa adapter"),
            },
            Err(err) => tracing::error!(error = %err, "Failed to configure Alexa adapter"),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/bot/start",
    tag = "bot",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration accepted", body = RegisterResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing service API key", body = crate::error::ErrorResponse),
    )
)]
pub async fn register_bot(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HttpAppError> {
    let details = request.details;

    install_platform_adapters(&state, &details).await;

    for kit in &details.agent_kits {
        if let Err(err) = state.agent_kits.register(kit) {
            tracing::error!(kit = %kit.name, error = %err, "agent kit registration failed");
        }
    }

    // Seed the lanes. The tweet lane carries the full registration; the
    // scanning lanes share one mention payload.
    state.lanes.tweet.seed(details.clone());

    let hot_profiles = state.lanes.hot_profiles.queue();
    hot_profiles.pause();
    for profile in &details.hotprofiles {
        hot_profiles.push(HotProfileJob {
            name: profile.name.clone(),
            handle: profile.handle.clone(),
            description: profile.description.clone(),
            prompt: profile.prompt.clone(),
        });
    }
    hot_profiles.resume();

    let handle = details
        .metadata
        .handle
        .clone()
        .unwrap_or_else(|| state.config.social.default_handle.clone());
    let job = MentionJob {
        handle,
        prompt: details.replies_prompt.clone(),
        details: details.clone(),
    };

    state.lanes.mentions.seed(job.clone());
    state.lanes.token_creation.seed(job.clone());
    if details.github.is_some() {
        state.lanes.github.seed(job.clone());
    }
    if details.tools.deploy_token {
        state.lanes.token_deploy.seed(job.clone());
    }
    if details.tools.create_nft_collection {
        state.lanes.nft_creation.seed(job.clone());
    }
    if details.tools.swap_tokens {
        state.lanes.token_swap.seed(job.clone());
    }
    if details.tools.lend_tokens {
        state.lanes.token_lend.seed(job.clone());
    }
    if details.tools.stake_sol {
        state.lanes.sol_stake.seed(job.clone());
    }
    if details.tools.fetch_token_price {
        state.lanes.token_price.seed(job.clone());
    }
    if details.tools.airdrop_tokens {
        state.lanes.token_airdrop.seed(job);
    }

    tracing::info!("registration accepted and lanes seeded");
    Ok(Json(RegisterResponse {
        message: "request registered in queue".to_string(),
    }))
}
