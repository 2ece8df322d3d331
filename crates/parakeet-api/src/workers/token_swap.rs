//! Token-swap worker: scans mentions for swap requests, executes them via
//! the agent kit, and queues a priority reply with the result.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, MentionJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::Tweet;

use super::parse::{field_after, word_after};
use super::support::{
    fresh_mentions, mark_checked, mark_tweet_used, matches_catch_phrase, WorkerDeps,
};

const SWAP_HOUR_CHECK: f64 = 0.02;
const FAILURE_REPLY: &str =
    "oops! something went wrong with your token swap attempt. please check the request format and try again.";

pub struct TokenSwapWorker {
    deps: Arc<WorkerDeps>,
}

impl TokenSwapWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    /// `Ok(None)` when the tweet is not a swap request at all.
    async fn verify_and_swap(&self, tweet: &Tweet, job: &MentionJob) -> Result<Option<String>> {
        let text = &tweet.text;
        if !matches_catch_phrase(text, &job.details.tools_catch_phrase) {
            tracing::debug!(tweet_id = %tweet.id, "not a token swap tweet");
            return Ok(None);
        }

        let target_mint =
            word_after(text, "target token mint").context("missing target token mint")?;
        let source_mint =
            field_after(text, "source token mint").context("missing source token mint")?;
        let amount: f64 = field_after(text, "amount")
            .context("missing amount")?
            .parse()
            .context("invalid amount")?;
        let slippage: f64 = field_after(text, "slippage")
            .context("missing slippage")?
            .parse()
            .context("invalid slippage")?;

        let kit = self.deps.agent_kits.for_text(text);
        let signature = kit
            .trade(&target_mint, amount, &source_mint, slippage)
            .await?;

        Ok(Some(format!(
            "swap complete\n- source token mint: {}\n- target token mint: {}\n- amount: {}\n- slippage: {}%\n- signature: {}",
            source_mint, target_mint, amount, slippage, signature
        )))
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::TokenSwap,
            SWAP_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            match self.verify_and_swap(&tweet, job).await {
                Ok(Some(details)) => {
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, details));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(tweet_id = %tweet.id, error = %err, "token swap failed");
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, FAILURE_REPLY));
                }
            }
            mark_tweet_used(
                &self.deps.cache,
                CapabilityId::TokenSwap,
                &tweet.id,
                "token swap tweet",
            )
            .await;
        }

        mark_checked(&self.deps.cache, CapabilityId::TokenSwap).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for TokenSwapWorker {
    async fn poll(&self, job: MentionJob, _ctx: &LaneContext<MentionJob>) -> Result<()> {
        self.scan(&job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::testing;

    fn job() -> MentionJob {
        let details: parakeet_core::models::RegisterDetails =
            serde_json::from_value(serde_json::json!({
                "metadata": { "handle": "craftybot" },
                "prompt": ["post about ai"],
                "replies_prompt": "reply kindly",
                "tools_catch_phrase": "under the rule of @craftybot"
            }))
            .unwrap();
        MentionJob {
            handle: "craftybot".to_string(),
            prompt: details.replies_prompt.clone(),
            details,
        }
    }

    fn swap_tweet(id: &str) -> parakeet_services::Tweet {
        testing::tweet(
            id,
            "under the rule of @craftybot swap\n\
             target token mint MintAAA111 now\n\
             source token mint MintBBB222\n\
             amount 1.5\n\
             slippage 0.3",
        )
    }

    #[tokio::test]
    async fn test_swap_request_executes_and_replies() {
        let social = testing::MockSocial::default();
        social.push_mention(swap_tweet("90"));
        let rig = testing::rig(social);
        let worker = TokenSwapWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        let trades = rig.kit.trades.lock().unwrap().clone();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].0, "MintAAA111");
        assert_eq!(trades[0].1, 1.5);
        assert_eq!(trades[0].2, "MintBBB222");

        let reply = rig.deps.priority_queue.next().await.unwrap();
        assert_eq!(reply.tweet_id, "90");
        assert!(reply.text.contains("trade-sig"));
    }

    #[tokio::test]
    async fn test_non_matching_tweet_is_skipped_but_marked() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet("91", "just saying hi"));
        let rig = testing::rig(social);
        let worker = TokenSwapWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        assert!(rig.kit.trades.lock().unwrap().is_empty());
        assert!(rig.deps.priority_queue.is_empty());
        // Marked so the next cycle does not rescan it.
        assert!(
            crate::workers::support::tweet_already_used(
                &rig.deps.cache,
                CapabilityId::TokenSwap,
                "91"
            )
            .await
        );
    }

    #[tokio::test]
    async fn test_malformed_request_gets_failure_reply() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet(
            "92",
            "under the rule of @craftybot swap with no fields",
        ));
        let rig = testing::rig(social);
        let worker = TokenSwapWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        let reply = rig.deps.priority_queue.next().await.unwrap();
        assert_eq!(reply.tweet_id, "92");
        assert_eq!(reply.text, FAILURE_REPLY);
    }

    #[tokio::test]
    async fn test_kit_failure_gets_failure_reply() {
        let social = testing::MockSocial::default();
        social.push_mention(swap_tweet("93"));
        let kit = testing::MockKit::default();
        kit.fail.store(true, std::sync::atomic::Ordering::SeqCst);
        let rig = testing::rig_with(social, testing::MockLlm::default(), kit);
        let worker = TokenSwapWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        let reply = rig.deps.priority_queue.next().await.unwrap();
        assert_eq!(reply.text, FAILURE_REPLY);
    }
}
