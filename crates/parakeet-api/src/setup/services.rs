//! Service client construction.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::RwLock;

use parakeet_core::Config;
use parakeet_infra::{Cache, MemoryCache};
use parakeet_queue::SerialQueue;
use parakeet_services::{
    AgentKit, GithubClient, HttpAgentKit, LanguageModel, LaunchpadClient, OpenAiChat,
    SocialPlatform, SvmAgentKits, TwitterApi,
};

use crate::state::{AppState, PlatformAdapters};
use crate::workers::support::ProfileDirectory;
use crate::workers::WorkerDeps;

/// Build every external client and the capability lanes, and assemble the
/// application state.
pub fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let timeout = config.http_timeout;

    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    let social: Arc<dyn SocialPlatform> = Arc::new(TwitterApi::new(&config.social, timeout)?);
    let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiChat::new(&config.llm, timeout)?);
    let default_kit: Arc<dyn AgentKit> = Arc::new(HttpAgentKit::new(&config.agentkit, timeout)?);
    let agent_kits = Arc::new(SvmAgentKits::new(
        default_kit,
        &config.agentkit.api_base,
        timeout,
    ));
    let launchpad = Arc::new(LaunchpadClient::new(&config.launchpad, timeout)?);
    let github = Arc::new(GithubClient::new(timeout)?);

    let reply_queue = SerialQueue::new();
    let priority_queue = SerialQueue::new();

    let deps = Arc::new(WorkerDeps {
        cache: cache.clone(),
        social: social.clone(),
        llm: llm.clone(),
        profiles: ProfileDirectory::new(
            social.clone(),
            cache.clone(),
            Duration::from_secs(config.social.user_profile_ttl_secs),
        ),
        agent_kits: agent_kits.clone(),
        launchpad: launchpad.clone(),
        github: github.clone(),
        reply_queue: reply_queue.clone(),
        priority_queue: priority_queue.clone(),
    });

    let lanes = super::lanes::build_lanes(config, deps, reply_queue, priority_queue);
    tracing::info!(lanes = lanes.statuses().len(), "capability lanes started");

    Ok(Arc::new(AppState {
        config: config.clone(),
        cache,
        social,
        llm,
        agent_kits,
        launchpad,
        github,
        lanes,
        adapters: RwLock::new(PlatformAdapters::default()),
    }))
}
