//! Route registration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use parakeet_core::Config;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::middleware::require_service_key;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let origins = &config.base.cors_origins;
    if origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {}", origin))
        })
        .collect::<Result<_>>()?;
    Ok(CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router> {
    let bot_routes = Router::new()
        .route("/start", post(handlers::register::register_bot))
        .route("/airdrop", post(handlers::airdrop::register_airdrop))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_service_key,
        ));

    let router = Router::new()
        .nest("/api/bot", bot_routes)
        .route("/live", get(handlers::health::liveness_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config)?)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    Ok(router)
}
