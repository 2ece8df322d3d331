//! Token-airdrop worker: sends a compressed airdrop to a list of addresses
//! parsed from the mention.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, MentionJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::Tweet;

use super::parse::{field_after, list_after, word_after};
use super::support::{
    fresh_mentions, mark_checked, mark_tweet_used, matches_catch_phrase, WorkerDeps,
};

const AIRDROP_HOUR_CHECK: f64 = 0.02;
const FAILURE_REPLY: &str =
    "oops! something went wrong with your airdrop attempt. please check the request format and try again.";

pub struct TokenAirdropWorker {
    deps: Arc<WorkerDeps>,
}

impl TokenAirdropWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn verify_and_airdrop(&self, tweet: &Tweet, job: &MentionJob) -> Result<Option<String>> {
        let text = &tweet.text;
        if !matches_catch_phrase(text, &job.details.tools_catch_phrase) {
            tracing::debug!(tweet_id = %tweet.id, "not an airdrop tweet");
            return Ok(None);
        }

        let mint = word_after(text, "target token mint").context("missing target token mint")?;
        let amount: u64 = field_after(text, "amount")
            .context("missing amount")?
            .parse()
            .context("invalid amount")?;
        let recipients =
            list_after(text, "to the following users:").context("missing recipient list")?;

        let kit = self.deps.agent_kits.for_text(text);
        let receipt = kit.airdrop(&mint, amount, &recipients).await?;

        Ok(Some(format!(
            "airdrop complete\n- token mint: {}\n- amount per recipient: {}\n- recipients: {}\n- estimated cost: {} lamports\n- signature: {}",
            mint,
            amount,
            recipients.len(),
            receipt.cost_estimate,
            receipt.signature
        )))
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::TokenAirdrop,
            AIRDROP_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            match self.verify_and_airdrop(&tweet, job).await {
                Ok(Some(details)) => {
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, details));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(tweet_id = %tweet.id, error = %err, "airdrop failed");
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, FAILURE_REPLY));
                }
            }
            mark_tweet_used(
                &self.deps.cache,
                CapabilityId::TokenAirdrop,
                &tweet.id,
                "airdrop tweet",
            )
            .await;
        }

        mark_checked(&self.deps.cache, CapabilityId::TokenAirdrop).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for TokenAirdropWorker {
    async fn poll(&self, job: MentionJob, _ctx: &LaneContext<MentionJob>) -> Result<()> {
        self.scan(&job).await
    }
}
