//! Token-price worker: answers price queries from mentions.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, MentionJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::Tweet;

use super::parse::word_after;
use super::support::{
    fresh_mentions, mark_checked, mark_tweet_used, matches_catch_phrase, WorkerDeps,
};

const PRICE_HOUR_CHECK: f64 = 0.02;
const FAILURE_REPLY: &str =
    "oops! could not fetch that token price. please check the mint address and try again.";

pub struct TokenPriceWorker {
    deps: Arc<WorkerDeps>,
}

impl TokenPriceWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn verify_and_fetch(&self, tweet: &Tweet, job: &MentionJob) -> Result<Option<String>> {
        let text = &tweet.text;
        if !matches_catch_phrase(text, &job.details.tools_catch_phrase) {
            tracing::debug!(tweet_id = %tweet.id, "not a price query tweet");
            return Ok(None);
        }

        let mint = word_after(text, "target token mint").context("missing target token mint")?;

        let kit = self.deps.agent_kits.for_text(text);
        let price = kit.fetch_price(&mint).await?;

        Ok(Some(format!("current price of {}: {} USDC", mint, price)))
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::TokenPrice,
            PRICE_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            match self.verify_and_fetch(&tweet, job).await {
                Ok(Some(details)) => {
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, details));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(tweet_id = %tweet.id, error = %err, "price fetch failed");
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, FAILURE_REPLY));
                }
            }
            mark_tweet_used(
                &self.deps.cache,
                CapabilityId::TokenPrice,
                &tweet.id,
                "price query tweet",
            )
            .await;
        }

        mark_checked(&self.deps.cache, CapabilityId::TokenPrice).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for TokenPriceWorker {
    async fn poll(&self, job: MentionJob, _ctx: &LaneContext<MentionJob>) -> Result<()> {
        self.scan(&job).await
    }
}
