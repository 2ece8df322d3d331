//! Mentions worker: scans the watched handle's mention timeline, generates
//! a reply per fresh mention, and feeds the reply lane. Also validates
//! quote-tweet airdrop claims against the active airdrop registry.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::airdrop::ACTIVE_AIRDROPS_KEY;
use parakeet_core::models::{ActiveAirdrops, CapabilityId, MentionJob, ReplyJob};
use parakeet_infra::cache_key;
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::{ContextMessage, Tweet};

use super::support::{
    fresh_mentions, mark_checked, mark_tweet_used, tweet_context, WorkerDeps, DEFAULT_REPLY_TEXT,
};

const MENTIONS_HOUR_CHECK: f64 = 0.02;

pub struct MentionsWorker {
    deps: Arc<WorkerDeps>,
}

impl MentionsWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    /// Validate a quote tweet against the active airdrops: the registered
    /// validator prompt decides, with a follower-count fallback. Counts are
    /// tracked per airdrop; exhausted airdrops are dropped from the registry.
    async fn verify_airdrop_claim(&self, tweet: &Tweet) -> Result<()> {
        let Some(quoted_id) = tweet.quoted_tweet_id() else {
            return Ok(());
        };
        let Some(author_id) = tweet.author_id.as_deref() else {
            return Ok(());
        };

        let registry_key = cache_key(ACTIVE_AIRDROPS_KEY);
        let Some(raw) = self.deps.cache.get(&registry_key).await else {
            tracing::debug!("no active airdrops registered");
            return Ok(());
        };
        let mut airdrops: ActiveAirdrops =
            serde_json::from_str(&raw).context("active airdrop registry is corrupt")?;
        let Some(airdrop) = airdrops.get_mut(quoted_id) else {
            tracing::debug!(quoted_id = %quoted_id, "quoted tweet has no active airdrop");
            return Ok(());
        };

        let verdict = self
            .deps
            .llm
            .complete(
                &airdrop.metadata.validator_prompt,
                &[ContextMessage::text(&tweet.text)],
            )
            .await?;

        let mut approved = verdict.to_lowercase().contains("true");
        if !approved {
            let mut author = self.deps.profiles.by_id(author_id, false).await?;
            if author.public_metrics.is_none() {
                author = self.deps.profiles.by_id(author_id, true).await?;
            }
            let followers = author
                .public_metrics
                .map(|m| m.followers_count)
                .unwrap_or(0);
            approved = followers >= airdrop.metadata.min_followers_count;
        }

        if !approved {
            tracing::info!(tweet_id = %tweet.id, "quote tweet did not qualify for the airdrop");
            return Ok(());
        }

        airdrop.count += 1;
        tracing::info!(
            tweet_id = %tweet.id,
            quoted_id = %quoted_id,
            count = airdrop.count,
            "airdrop claim approved"
        );
        if airdrop.is_exhausted() {
            airdrops.remove(quoted_id);
        }
        self.deps
            .cache
            .set(&registry_key, serde_json::to_string(&airdrops)?)
            .await;
        Ok(())
    }

    async fn handle_mention(&self, tweet: Tweet, job: &MentionJob) {
        if let Err(err) = self.verify_airdrop_claim(&tweet).await {
            tracing::error!(tweet_id = %tweet.id, error = %err, "airdrop validation failed");
        }

        let reply = async {
            let text = self
                .deps
                .llm
                .complete(&job.prompt, &tweet_context(&tweet))
                .await?;
            let text = if text.is_empty() {
                DEFAULT_REPLY_TEXT.to_string()
            } else {
                text
            };
            Ok::<_, anyhow::Error>(ReplyJob::text(&tweet.id, text))
        }
        .await;

        match reply {
            Ok(reply) => {
                let note = serde_json::to_string(&reply).unwrap_or_default();
                tracing::debug!(tweet_id = %tweet.id, "queueing generated reply");
                self.deps.reply_queue.push(reply);
                mark_tweet_used(&self.deps.cache, CapabilityId::Mentions, &tweet.id, &note).await;
            }
            Err(err) => {
                tracing::error!(tweet_id = %tweet.id, error = %err, "reply generation failed");
            }
        }
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::Mentions,
            MENTIONS_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        futures::future::join_all(
            tweets
                .into_iter()
                .map(|tweet| self.handle_mention(tweet, job)),
        )
        .await;

        mark_checked(&self.deps.cache, CapabilityId::Mentions).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for MentionsWorker {
    async fn poll(&self, job: MentionJob, _ctx: &LaneContext<MentionJob>) -> Result<()> {
        self.scan(&job).await
    }
}
