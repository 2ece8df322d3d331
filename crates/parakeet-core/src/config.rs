//! Configuration module
//!
//! Env-var driven configuration for the bot service: server, social
//! platform, language model, agent kit, launchpad, and the per-capability
//! rate windows and reset cadences.

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_HANDLE, HOT_PROFILES_RESET_INTERVAL_MS, MENTIONS_RESET_INTERVAL_MS, MENTIONS_WINDOW,
    PRIORITY_RESET_INTERVAL_MS, REPLY_RESET_INTERVAL_MS, REPLY_WINDOW, TOOLS_RESET_INTERVAL_MS,
    TWEET_RESET_INTERVAL_MS, TWEET_WINDOW, USER_PROFILE_TTL_SECS,
};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Base configuration shared by the server surface
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Optional service-to-service API key required on mutating endpoints.
    pub service_api_key: Option<String>,
}

/// Social platform client configuration
#[derive(Clone, Debug)]
pub struct SocialConfig {
    pub api_base: String,
    pub upload_base: String,
    pub bearer_token: String,
    pub default_handle: String,
    pub user_profile_ttl_secs: u64,
}

/// Language model client configuration
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

/// Blockchain agent kit configuration
#[derive(Clone, Debug)]
pub struct AgentKitConfig {
    pub api_base: String,
    pub rpc_endpoint: Option<String>,
    pub private_key: Option<String>,
}

/// Token launchpad configuration
#[derive(Clone, Debug)]
pub struct LaunchpadConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub metadata_endpoint: String,
}

/// Rate windows and reset cadences per capability lane
#[derive(Clone, Debug)]
pub struct LaneConfig {
    pub reply_window: u32,
    pub tweet_window: u32,
    pub mentions_window: u32,
    pub reply_reset_interval: Duration,
    pub priority_reply_reset_interval: Duration,
    pub tweet_reset_interval: Duration,
    pub mentions_reset_interval: Duration,
    pub tools_reset_interval: Duration,
    pub hot_profiles_reset_interval: Duration,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub social: SocialConfig,
    pub llm: LlmConfig,
    pub agentkit: AgentKitConfig,
    pub launchpad: LaunchpadConfig,
    pub lanes: LaneConfig,
    pub http_timeout: Duration,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_parse(key, default_ms))
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            service_api_key: env::var("SERVICE_API_KEY").ok().filter(|s| !s.is_empty()),
        };

        let social = SocialConfig {
            api_base: env::var("SOCIAL_API_BASE")
                .unwrap_or_else(|_| "https://api.twitter.com".to_string()),
            upload_base: env::var("SOCIAL_UPLOAD_BASE")
                .unwrap_or_else(|_| "https://upload.twitter.com".to_string()),
            bearer_token: env::var("SOCIAL_BEARER_TOKEN")
                .map_err(|_| anyhow::anyhow!("SOCIAL_BEARER_TOKEN must be set"))?,
            default_handle: env::var("DEFAULT_HANDLE")
                .unwrap_or_else(|_| DEFAULT_HANDLE.to_string()),
            user_profile_ttl_secs: env_parse("USER_PROFILE_TTL_SECS", USER_PROFILE_TTL_SECS),
        };

        let llm = LlmConfig {
            api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set"))?,
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
        };

        let agentkit = AgentKitConfig {
            api_base: env::var("AGENTKIT_API_BASE")
                .unwrap_or_else(|_| "http://127.0.0.1:7010".to_string()),
            rpc_endpoint: env::var("RPC_URL").ok(),
            private_key: env::var("PRIVATE_KEY").ok(),
        };

        let launchpad = LaunchpadConfig {
            api_base: env::var("LAUNCHPAD_API_BASE")
                .unwrap_or_else(|_| "https://api.pump.fun".to_string()),
            api_key: env::var("LAUNCHPAD_API_KEY").ok().filter(|s| !s.is_empty()),
            metadata_endpoint: env::var("LAUNCHPAD_METADATA_ENDPOINT")
                .unwrap_or_else(|_| "https://pump.fun/api/ipfs".to_string()),
        };

        let lanes = LaneConfig {
            reply_window: env_parse("REPLY_WINDOW", REPLY_WINDOW),
            tweet_window: env_parse("TWEET_WINDOW", TWEET_WINDOW),
            mentions_window: env_parse("MENTIONS_WINDOW", MENTIONS_WINDOW),
            reply_reset_interval: env_millis("REPLY_RESET_INTERVAL_MS", REPLY_RESET_INTERVAL_MS),
            priority_reply_reset_interval: env_millis(
                "PRIORITY_RESET_INTERVAL_MS",
                PRIORITY_RESET_INTERVAL_MS,
            ),
            tweet_reset_interval: env_millis("TWEET_RESET_INTERVAL_MS", TWEET_RESET_INTERVAL_MS),
            mentions_reset_interval: env_millis(
                "MENTIONS_RESET_INTERVAL_MS",
                MENTIONS_RESET_INTERVAL_MS,
            ),
            tools_reset_interval: env_millis("TOOLS_RESET_INTERVAL_MS", TOOLS_RESET_INTERVAL_MS),
            hot_profiles_reset_interval: env_millis(
                "HOT_PROFILES_RESET_INTERVAL_MS",
                HOT_PROFILES_RESET_INTERVAL_MS,
            ),
        };

        let config = Config {
            base,
            social,
            llm,
            agentkit,
            launchpad,
            lanes,
            http_timeout: Duration::from_secs(env_parse(
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.social.bearer_token.is_empty() {
            return Err(anyhow::anyhow!("SOCIAL_BEARER_TOKEN must not be empty"));
        }
        if self.llm.api_key.is_empty() {
            return Err(anyhow::anyhow!("OPENAI_API_KEY must not be empty"));
        }
        if self.lanes.reply_window == 0
            || self.lanes.tweet_window == 0
            || self.lanes.mentions_window == 0
        {
            return Err(anyhow::anyhow!("rate windows must be at least 1"));
        }
        if self.lanes.reply_reset_interval.is_zero()
            || self.lanes.tweet_reset_interval.is_zero()
            || self.lanes.mentions_reset_interval.is_zero()
        {
            return Err(anyhow::anyhow!("reset intervals must be non-zero"));
        }
        Ok(())
    }
}
