//! Lane registration: one gate/queue/scheduler triplet per capability,
//! bound to its worker.

use std::sync::Arc;

use parakeet_core::models::{CapabilityId, ReplyJob};
use parakeet_core::Config;
use parakeet_queue::{Lane, SerialQueue};

use crate::state::Lanes;
use crate::workers::{
    github_issues::GithubIssuesWorker, hot_profiles::HotProfilesWorker, mentions::MentionsWorker,
    nft_creation::NftCreationWorker, reply::ReplyWorker, sol_stake::SolStakeWorker,
    token_airdrop::TokenAirdropWorker, token_creation::TokenCreationWorker,
    token_deploy::TokenDeployWorker, token_lend::TokenLendWorker, token_price::TokenPriceWorker,
    token_swap::TokenSwapWorker, tweet::TweetWorker, WorkerDeps,
};

/// Register every capability lane. The reply and priority-reply queues are
/// passed in because the scanning workers hold producer handles to them.
pub fn build_lanes(
    config: &Config,
    deps: Arc<WorkerDeps>,
    reply_queue: SerialQueue<ReplyJob>,
    priority_queue: SerialQueue<ReplyJob>,
) -> Lanes {
    let lanes = &config.lanes;

    Lanes {
        reply: Lane::start(
            CapabilityId::Reply,
            lanes.reply_window,
            lanes.reply_reset_interval,
            reply_queue,
            Arc::new(ReplyWorker::new(deps.clone())),
        ),
        priority_reply: Lane::start(
            CapabilityId::PriorityReply,
            lanes.reply_window,
            lanes.priority_reply_reset_interval,
            priority_queue,
            Arc::new(ReplyWorker::new(deps.clone())),
        ),
        tweet: Lane::start(
            CapabilityId::Tweet,
            lanes.tweet_window,
            lanes.tweet_reset_interval,
            SerialQueue::new(),
            Arc::new(TweetWorker::new(deps.clone())),
        ),
        hot_profiles: Lane::start(
            CapabilityId::HotProfiles,
            lanes.tweet_window,
            lanes.hot_profiles_reset_interval,
            SerialQueue::new(),
            Arc::new(HotProfilesWorker::new(deps.clone())),
        ),
        mentions: Lane::start(
            CapabilityId::Mentions,
            lanes.mentions_window,
            lanes.mentions_reset_interval,
            SerialQueue::new(),
            Arc::new(MentionsWorker::new(deps.clone())),
        ),
        token_creation: Lane::start(
            CapabilityId::TokenCreation,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(TokenCreationWorker::new(deps.clone())),
        ),
        token_deploy: Lane::start(
            CapabilityId::TokenDeploy,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(TokenDeployWorker::new(deps.clone())),
        ),
        nft_creation: Lane::start(
            CapabilityId::NftCreation,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(NftCreationWorker::new(deps.clone())),
        ),
        token_swap: Lane::start(
            CapabilityId::TokenSwap,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(TokenSwapWorker::new(deps.clone())),
        ),
        token_lend: Lane::start(
            CapabilityId::TokenLend,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(TokenLendWorker::new(deps.clone())),
        ),
        sol_stake: Lane::start(
            CapabilityId::SolStake,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(SolStakeWorker::new(deps.clone())),
        ),
        token_airdrop: Lane::start(
            CapabilityId::TokenAirdrop,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(TokenAirdropWorker::new(deps.clone())),
        ),
        token_price: Lane::start(
            CapabilityId::TokenPrice,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(TokenPriceWorker::new(deps.clone())),
        ),
        github: Lane::start(
            CapabilityId::Github,
            lanes.mentions_window,
            lanes.tools_reset_interval,
            SerialQueue::new(),
            Arc::new(GithubIssuesWorker::new(deps)),
        ),
    }
}
