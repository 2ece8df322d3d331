//! Registration payload: everything a bot owner submits to bring a bot
//! online, from prompts to platform adapters to enabled on-chain tools.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(nested)]
    pub details: RegisterDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterDetails {
    pub metadata: BotMetadata,
    /// Pool of tweet prompts; one is drawn at random per tweet cycle.
    #[validate(length(min = 1, message = "at least one tweet prompt is required"))]
    pub prompt: Vec<String>,
    /// Pool of prompts used when weaving current news into a tweet.
    #[serde(default)]
    pub news_prompt: Vec<String>,
    /// Handles whose latest posts seed the news prompts.
    #[serde(default)]
    pub news_handles: Vec<String>,
    /// Prompt used when replying to mentions.
    #[validate(length(min = 1, message = "replies_prompt is required"))]
    pub replies_prompt: String,
    #[serde(default)]
    pub hotprofiles_prompt: Option<String>,
    #[serde(default)]
    pub hotprofiles: Vec<HotProfile>,
    /// Phrase a tweet must contain before any on-chain tool runs.
    #[serde(default)]
    pub tools_catch_phrase: String,
    #[serde(default)]
    pub github: Option<GithubConfig>,
    #[serde(default)]
    pub tools: ToolToggles,
    /// Additional agent kits addressable by catch phrase.
    #[serde(default)]
    pub agent_kits: Vec<AgentKitRef>,
    #[serde(default)]
    pub platforms: Option<Platforms>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BotMetadata {
    /// Social handle the bot watches for mentions.
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub tg_handle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HotProfile {
    pub name: String,
    pub handle: String,
    #[serde(default)]
    pub description: String,
    pub prompt: String,
}

/// Which agent-kit operations this registration enables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ToolToggles {
    pub deploy_token: bool,
    pub create_nft_collection: bool,
    pub swap_tokens: bool,
    pub lend_tokens: bool,
    pub stake_sol: bool,
    pub fetch_token_price: bool,
    pub airdrop_tokens: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    pub auth_token: String,
    /// When true, `auth_token` names an environment variable instead of a
    /// literal token.
    #[serde(default)]
    pub from_env: bool,
}

impl GithubConfig {
    /// Resolve the configured token, following the env indirection if set.
    pub fn resolve_token(&self) -> Option<String> {
        if self.from_env {
            std::env::var(&self.auth_token).ok()
        } else {
            Some(self.auth_token.clone())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgentKitRef {
    pub name: String,
    /// Phrase that routes a tweet to this kit instead of the default one.
    pub tweet_catch_phrase: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub environments: AgentKitEnvironments,
    /// When true, the environment values name env vars instead of literals.
    #[serde(default)]
    pub from_env_file: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgentKitEnvironments {
    pub rpc_endpoint: String,
    pub private_key: String,
}

impl AgentKitRef {
    pub fn resolve_rpc_endpoint(&self) -> Option<String> {
        resolve(self.from_env_file, &self.environments.rpc_endpoint)
    }

    pub fn resolve_private_key(&self) -> Option<String> {
        resolve(self.from_env_file, &self.environments.private_key)
    }
}

fn resolve(from_env: bool, value: &str) -> Option<String> {
    if from_env {
        std::env::var(value).ok()
    } else {
        Some(value.to_string())
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Platforms {
    #[serde(default)]
    pub slack: Option<SlackConfig>,
    #[serde(default)]
    pub discord: Option<DiscordConfig>,
    #[serde(default)]
    pub alexa: Option<AlexaConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlackConfig {
    pub api_key: String,
    #[serde(default)]
    pub from_env_file: bool,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl SlackConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve(self.from_env_file, &self.api_key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiscordConfig {
    pub token: String,
    #[serde(default)]
    pub from_env_file: bool,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl DiscordConfig {
    pub fn resolve_token(&self) -> Option<String> {
        resolve(self.from_env_file, &self.token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlexaConfig {
    pub invocation_name: String,
    pub skill_id: String,
    #[serde(default)]
    pub from_env_file: bool,
}
