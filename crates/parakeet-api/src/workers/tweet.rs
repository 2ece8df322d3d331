//! Tweet worker: generates and posts timeline tweets on the heartbeat.
//!
//! Most cycles draw a random prompt from the registered pool. Every few
//! hours the latest post of a configured news handle is woven through a
//! news prompt instead.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, RegisterDetails};
use parakeet_core::util::{is_older_than_hours, now_millis};
use parakeet_infra::cache_key;
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::ContextMessage;

use super::support::{debounced, mark_checked, WorkerDeps, DEFAULT_REPLY_TEXT};

/// A new tweet at most every 2.5 hours regardless of lane cadence.
const TWEET_HOUR_CHECK: f64 = 2.5;
/// News is woven in at most every 3 hours.
const NEWS_HOUR_CHECK: f64 = 3.0;

const NEWS_STAMP_KEY: &str = "lastnewstime";

pub struct TweetWorker {
    deps: Arc<WorkerDeps>,
}

impl TweetWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn news_due(&self) -> bool {
        let key = cache_key(NEWS_STAMP_KEY);
        match self.deps.cache.get(&key).await {
            Some(stamp) => stamp
                .parse::<i64>()
                .map(|ts| is_older_than_hours(ts, NEWS_HOUR_CHECK))
                .unwrap_or(true),
            None => true,
        }
    }

    /// Compose the tweet text: either from the latest post of a news handle
    /// or from the plain prompt pool.
    async fn compose(&self, details: &RegisterDetails) -> Result<String> {
        let news_prompt = parakeet_core::util::random_item(&details.news_prompt);
        let news_handle = parakeet_core::util::random_item(&details.news_handles);

        if let (Some(news_prompt), Some(news_handle)) = (news_prompt, news_handle) {
            if self.news_due().await {
                let profile = self.deps.profiles.by_username(news_handle, false).await?;
                let timeline = self
                    .deps
                    .social
                    .user_timeline(&profile.id, 5)
                    .await
                    .context("news timeline fetch failed")?;
                if let Some(news) = timeline.first() {
                    let text = self
                        .deps
                        .llm
                        .complete(news_prompt, &[ContextMessage::text(&news.text)])
                        .await?;
                    self.deps
                        .cache
                        .set(&cache_key(NEWS_STAMP_KEY), now_millis().to_string())
                        .await;
                    return Ok(text);
                }
            }
        }

        let prompt = parakeet_core::util::random_item(&details.prompt)
            .context("registration has no tweet prompts")?;
        self.deps.llm.complete(prompt, &[]).await
    }

    async fn generate_and_tweet(&self, details: &RegisterDetails) -> Result<()> {
        if debounced(&self.deps.cache, CapabilityId::Tweet, TWEET_HOUR_CHECK).await {
            return Ok(());
        }

        let text = self.compose(details).await?;
        let text = if text.is_empty() {
            DEFAULT_REPLY_TEXT.to_string()
        } else {
            text
        };

        let tweet_id = self.deps.social.post_tweet(&text).await?;
        tracing::info!(tweet_id = %tweet_id, "tweet posted");
        mark_checked(&self.deps.cache, CapabilityId::Tweet).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<RegisterDetails> for TweetWorker {
    async fn poll(
        &self,
        details: RegisterDetails,
        _ctx: &LaneContext<RegisterDetails>,
    ) -> Result<()> {
        self.generate_and_tweet(&details).await
    }
}
