//! SOL-stake worker: stakes the requested amount via the agent kit.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, MentionJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::Tweet;

use super::parse::field_after;
use super::support::{
    fresh_mentions, mark_checked, mark_tweet_used, matches_catch_phrase, WorkerDeps,
};

const STAKE_HOUR_CHECK: f64 = 0.02;
const FAILURE_REPLY: &str =
    "oops! something went wrong with your staking attempt. please check the request format and try again.";

pub struct SolStakeWorker {
    deps: Arc<WorkerDeps>,
}

impl SolStakeWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn verify_and_stake(&self, tweet: &Tweet, job: &MentionJob) -> Result<Option<String>> {
        let text = &tweet.text;
        if !matches_catch_phrase(text, &job.details.tools_catch_phrase) {
            tracing::debug!(tweet_id = %tweet.id, "not a staking tweet");
            return Ok(None);
        }

        let amount: f64 = field_after(text, "amount")
            .context("missing amount")?
            .parse()
            .context("invalid amount")?;

        let kit = self.deps.agent_kits.for_text(text);
        let signature = kit.stake(amount).await?;

        Ok(Some(format!(
            "stake complete\n- amount: {} SOL\n- signature: {}",
            amount, signature
        )))
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::SolStake,
            STAKE_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            match self.verify_and_stake(&tweet, job).await {
                Ok(Some(details)) => {
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, details));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(tweet_id = %tweet.id, error = %err, "staking failed");
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, FAILURE_REPLY));
                }
            }
            mark_tweet_used(
                &self.deps.cache,
                CapabilityId::SolStake,
                &tweet.id,
                "staking tweet",
            )
            .await;
        }

        mark_checked(&self.deps.cache, CapabilityId::SolStake).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for SolStakeWorker {
    async fn poll(&self, job: MentionJob, _ctx: &LaneContext<MentionJob>) -> Result<()> {
        self.scan(&job).await
    }
}
