//! HTTP surface tests: registration, airdrop registration, auth, health.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum_test::TestServer;
use tokio::sync::RwLock;

use parakeet_api::setup::lanes::build_lanes;
use parakeet_api::setup::routes::setup_routes;
use parakeet_api::state::{AppState, PlatformAdapters};
use parakeet_api::workers::support::ProfileDirectory;
use parakeet_api::workers::WorkerDeps;
use parakeet_core::config::{
    AgentKitConfig, BaseConfig, Config, LaneConfig, LaunchpadConfig, LlmConfig, SocialConfig,
};
use parakeet_infra::{Cache, MemoryCache};
use parakeet_queue::SerialQueue;
use parakeet_services::{
    AgentKit, AirdropReceipt, Completion, ContextMessage, GithubClient, LanguageModel,
    LaunchpadClient, NftCollectionSpec, SocialPlatform, SvmAgentKits, ToolSpec, Tweet, UserProfile,
};

struct StubSocial;

#[async_trait]
impl SocialPlatform for StubSocial {
    async fn user_by_username(&self, username: &str) -> Result<UserProfile> {
        Ok(UserProfile {
            id: format!("uid-{}", username),
            username: username.to_string(),
            public_metrics: None,
        })
    }
    async fn user_by_id(&self, user_id: &str) -> Result<UserProfile> {
        Ok(UserProfile {
            id: user_id.to_string(),
            username: "someone".to_string(),
            public_metrics: None,
        })
    }
    async fn mention_timeline(&self, _user_id: &str) -> Result<Vec<Tweet>> {
        Ok(Vec::new())
    }
    async fn user_timeline(&self, _user_id: &str, _max_results: u32) -> Result<Vec<Tweet>> {
        Ok(Vec::new())
    }
    async fn post_tweet(&self, _text: &str) -> Result<String> {
        Ok("tweet-id".to_string())
    }
    async fn post_reply(
        &self,
        _text: &str,
        _in_reply_to: &str,
        _media_ids: &[String],
    ) -> Result<String> {
        Ok("reply-id".to_string())
    }
    async fn upload_media(&self, _bytes: Vec<u8>, _mime_type: &str) -> Result<String> {
        Ok("media-id".to_string())
    }
    async fn fetch_image(&self, _url: &str) -> Result<(Vec<u8>, String)> {
        Ok((Vec::new(), "image/png".to_string()))
    }
}

struct StubLlm;

#[async_trait]
impl LanguageModel for StubLlm {
    async fn complete(&self, _prompt: &str, _context: &[ContextMessage]) -> Result<String> {
        Ok("stub".to_string())
    }
    async fn complete_with_tools(
        &self,
        _prompt: &str,
        _context: &[ContextMessage],
        _tools: &[ToolSpec],
    ) -> Result<Completion> {
        Ok(Completion::default())
    }
}

struct StubKit;

#[async_trait]
impl AgentKit for StubKit {
    async fn deploy_token(&self, _: &str, _: &str, _: &str, _: u8, _: u64) -> Result<String> {
        Ok("mint".to_string())
    }
    async fn create_nft_collection(&self, _: &NftCollectionSpec) -> Result<String> {
        Ok("collection".to_string())
    }
    async fn trade(&self, _: &str, _: f64, _: &str, _: f64) -> Result<String> {
        Ok("sig".to_string())
    }
    async fn lend(&self, _: f64) -> Result<String> {
        Ok("sig".to_string())
    }
    async fn stake(&self, _: f64) -> Result<String> {
        Ok("sig".to_string())
    }
    async fn airdrop(&self, _: &str, _: u64, _: &[String]) -> Result<AirdropReceipt> {
        Ok(AirdropReceipt {
            signature: "sig".to_string(),
            cost_estimate: 0,
        })
    }
    async fn fetch_price(&self, _: &str) -> Result<String> {
        Ok("1.0".to_string())
    }
}

fn test_config(service_api_key: Option<String>) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            service_api_key,
        },
        social: SocialConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            upload_base: "http://127.0.0.1:1".to_string(),
            bearer_token: "token".to_string(),
            default_handle: "parakeetbot".to_string(),
            user_profile_ttl_secs: 86_400,
        },
        llm: LlmConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            api_key: "key".to_string(),
            model: "gpt-4o".to_string(),
        },
        agentkit: AgentKitConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            rpc_endpoint: None,
            private_key: None,
        },
        launchpad: LaunchpadConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            api_key: None,
            metadata_endpoint: "http://127.0.0.1:1/api/ipfs".to_string(),
        },
        lanes: LaneConfig {
            reply_window: 1,
            tweet_window: 1,
            mentions_window: 1,
            reply_reset_interval: Duration::from_secs(3600),
            priority_reply_reset_interval: Duration::from_secs(3600),
            tweet_reset_interval: Duration::from_secs(3600),
            mentions_reset_interval: Duration::from_secs(3600),
            tools_reset_interval: Duration::from_secs(3600),
            hot_profiles_reset_interval: Duration::from_secs(3600),
        },
        http_timeout: Duration::from_secs(5),
    }
}

fn test_state(config: Config) -> Arc<AppState> {
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    let social: Arc<dyn SocialPlatform> = Arc::new(StubSocial);
    let llm: Arc<dyn LanguageModel> = Arc::new(StubLlm);
    let agent_kits = Arc::new(SvmAgentKits::new(
        Arc::new(StubKit),
        &config.agentkit.api_base,
        config.http_timeout,
    ));
    let launchpad = Arc::new(LaunchpadClient::new(&config.launchpad, config.http_timeout).unwrap());
    let github = Arc::new(GithubClient::new(config.http_timeout).unwrap());

    let reply_queue = SerialQueue::new();
    let priority_queue = SerialQueue::new();
    let deps = Arc::new(WorkerDeps {
        cache: cache.clone(),
        social: social.clone(),
        llm: llm.clone(),
        profiles: ProfileDirectory::new(social.clone(), cache.clone(), Duration::from_secs(60)),
        agent_kits: agent_kits.clone(),
        launchpad: launchpad.clone(),
        github: github.clone(),
        reply_queue: reply_queue.clone(),
        priority_queue: priority_queue.clone(),
    });
    let lanes = build_lanes(&config, deps, reply_queue, priority_queue);

    Arc::new(AppState {
        config,
        cache,
        social,
        llm,
        agent_kits,
        launchpad,
        github,
        lanes,
        adapters: RwLock::new(PlatformAdapters::default()),
    })
}

fn server(state: Arc<AppState>) -> TestServer {
    let config = state.config.clone();
    let router = setup_routes(&config, state).unwrap();
    TestServer::new(router).unwrap()
}

fn registration_payload() -> serde_json::Value {
    serde_json::json!({
        "details": {
            "metadata": { "handle": "craftybot" },
            "prompt": ["write a short post about ai agents"],
            "replies_prompt": "reply in a friendly tone",
            "tools_catch_phrase": "under the rule of @craftybot",
            "tools": { "swap_tokens": true, "stake_sol": true },
            "agent_kits": [{
                "name": "alt",
                "tweet_catch_phrase": "with my alt wallet",
                "environments": {
                    "rpc_endpoint": "https://rpc.example.com",
                    "private_key": "secret"
                }
            }]
        }
    })
}

#[tokio::test]
async fn test_register_accepts_valid_payload() {
    let state = test_state(test_config(None));
    let server = server(state.clone());

    let response = server
        .post("/api/bot/start")
        .json(&registration_payload())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "request registered in queue");

    // The extra agent kit was registered.
    assert_eq!(state.agent_kits.len(), 1);
}

#[tokio::test]
async fn test_register_rejects_missing_details() {
    let state = test_state(test_config(None));
    let server = server(state);

    let response = server
        .post("/api/bot/start")
        .json(&serde_json::json!({ "wrong": true }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_register_rejects_empty_prompts() {
    let state = test_state(test_config(None));
    let server = server(state);

    let mut payload = registration_payload();
    payload["details"]["prompt"] = serde_json::json!([]);
    let response = server.post("/api/bot/start").json(&payload).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_service_key_is_enforced() {
    let state = test_state(test_config(Some("sekret".to_string())));
    let server = server(state);

    let denied = server
        .post("/api/bot/start")
        .json(&registration_payload())
        .await;
    denied.assert_status_unauthorized();

    let allowed = server
        .post("/api/bot/start")
        .add_header("x-api-key", "sekret")
        .json(&registration_payload())
        .await;
    allowed.assert_status_ok();
}

#[tokio::test]
async fn test_airdrop_registration_round_trip() {
    let state = test_state(test_config(None));
    let server = server(state.clone());

    let response = server
        .post("/api/bot/airdrop")
        .json(&serde_json::json!({
            "tweet_id": "99",
            "limit": 3,
            "validator_prompt": "is this quote tweet worthy?",
            "min_followers_count": 100
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["tweet_id"], "99");

    // Registered airdrop is in the cache under the namespaced key.
    let raw = state
        .cache
        .get(&parakeet_infra::cache_key(
            parakeet_core::models::airdrop::ACTIVE_AIRDROPS_KEY,
        ))
        .await
        .expect("airdrop registry missing");
    assert!(raw.contains("\"99\""));
}

#[tokio::test]
async fn test_health_reports_all_lanes() {
    let state = test_state(test_config(None));
    let server = server(state);

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["lanes"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let state = test_state(test_config(None));
    let server = server(state);

    server.get("/live").await.assert_status_ok();
    server.get("/ready").await.assert_status_ok();
}
