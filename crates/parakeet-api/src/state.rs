//! Shared application state: configuration, the cache, the external service
//! clients, the capability lanes, and the chat platform adapters installed
//! at registration time.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use parakeet_core::models::{CapabilityId, HotProfileJob, MentionJob, RegisterDetails, ReplyJob};
use parakeet_core::Config;
use parakeet_infra::Cache;
use parakeet_queue::Lane;
use parakeet_services::{
    AlexaAdapter, DiscordAdapter, GithubClient, LanguageModel, LaunchpadClient, SlackAdapter,
    SocialPlatform, SvmAgentKits,
};

pub struct AppState {
    pub config: Config,
    pub cache: Arc<dyn Cache>,
    pub social: Arc<dyn SocialPlatform>,
    pub llm: Arc<dyn LanguageModel>,
    pub agent_kits: Arc<SvmAgentKits>,
    pub launchpad: Arc<LaunchpadClient>,
    pub github: Arc<GithubClient>,
    pub lanes: Lanes,
    /// Chat platform adapters installed by the most recent registration.
    pub adapters: RwLock<PlatformAdapters>,
}

#[derive(Default)]
pub struct PlatformAdapters {
    pub slack: Option<Arc<SlackAdapter>>,
    pub discord: Option<Arc<DiscordAdapter>>,
    pub alexa: Option<Arc<AlexaAdapter>>,
}

/// One lane per capability, assembled once at startup.
pub struct Lanes {
    pub reply: Lane<ReplyJob>,
    pub priority_reply: Lane<ReplyJob>,
    pub tweet: Lane<RegisterDetails>,
    pub hot_profiles: Lane<HotProfileJob>,
    pub mentions: Lane<MentionJob>,
    pub token_creation: Lane<MentionJob>,
    pub token_deploy: Lane<MentionJob>,
    pub nft_creation: Lane<MentionJob>,
    pub token_swap: Lane<MentionJob>,
    pub token_lend: Lane<MentionJob>,
    pub sol_stake: Lane<MentionJob>,
    pub token_airdrop: Lane<MentionJob>,
    pub token_price: Lane<MentionJob>,
    pub github: Lane<MentionJob>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LaneStatus {
    pub capability: CapabilityId,
    pub remaining: u32,
    pub ceiling: u32,
    pub paused: bool,
    pub depth: usize,
}

impl Lanes {
    pub fn statuses(&self) -> Vec<LaneStatus> {
        fn status<T: Clone + Send + 'static>(lane: &Lane<T>) -> LaneStatus {
            LaneStatus {
                capability: lane.id(),
                remaining: lane.gate().remaining(),
                ceiling: lane.gate().ceiling(),
                paused: lane.queue().is_paused(),
                depth: lane.queue().len(),
            }
        }

        vec![
            status(&self.reply),
            status(&self.priority_reply),
            status(&self.tweet),
            status(&self.hot_profiles),
            status(&self.mentions),
            status(&self.token_creation),
            status(&self.token_deploy),
            status(&self.nft_creation),
            status(&self.token_swap),
            status(&self.token_lend),
            status(&self.sol_stake),
            status(&self.token_airdrop),
            status(&self.token_price),
            status(&self.github),
        ]
    }

    /// Stop every scheduler and close every queue; in-flight cycles finish.
    pub async fn shutdown_all(&self) {
        self.reply.shutdown().await;
        self.priority_reply.shutdown().await;
        self.tweet.shutdown().await;
        self.hot_profiles.shutdown().await;
        self.mentions.shutdown().await;
        self.token_creation.shutdown().await;
        self.token_deploy.shutdown().await;
        self.nft_creation.shutdown().await;
        self.token_swap.shutdown().await;
        self.token_lend.shutdown().await;
        self.sol_stake.shutdown().await;
        self.token_airdrop.shutdown().await;
        self.token_price.shutdown().await;
        self.github.shutdown().await;
    }
}
