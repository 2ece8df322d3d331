//! OpenAPI documentation.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::register::register_bot,
        crate::handlers::airdrop::register_airdrop,
        crate::handlers::health::liveness_check,
        crate::handlers::health::readiness_check,
        crate::handlers::health::health_check,
    ),
    components(schemas(
        parakeet_core::models::RegisterRequest,
        parakeet_core::models::register::RegisterDetails,
        parakeet_core::models::register::BotMetadata,
        parakeet_core::models::register::HotProfile,
        parakeet_core::models::register::ToolToggles,
        parakeet_core::models::register::GithubConfig,
        parakeet_core::models::register::AgentKitRef,
        parakeet_core::models::register::AgentKitEnvironments,
        parakeet_core::models::register::Platforms,
        parakeet_core::models::register::SlackConfig,
        parakeet_core::models::register::DiscordConfig,
        parakeet_core::models::register::AlexaConfig,
        parakeet_core::models::AirdropRegistration,
        crate::handlers::register::RegisterResponse,
        crate::handlers::airdrop::AirdropResponse,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "bot", description = "Bot registration endpoints"),
        (name = "health", description = "Health probes"),
    )
)]
pub struct ApiDoc;
