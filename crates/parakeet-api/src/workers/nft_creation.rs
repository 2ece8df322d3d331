//! NFT-creation worker: deploys an NFT collection from a mention request.
//! The requesting author is recorded as the sole creator.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, MentionJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::agentkit::{NftCreator, NftCollectionSpec};
use parakeet_services::Tweet;

use super::parse::field_after;
use super::support::{
    fresh_mentions, mark_checked, mark_tweet_used, matches_catch_phrase, WorkerDeps,
};

const NFT_HOUR_CHECK: f64 = 0.02;
const DEFAULT_ROYALTY_BASIS_POINTS: u16 = 500;
const FAILURE_REPLY: &str =
    "oops! something went wrong with your collection launch attempt. please check the request format and try again.";

pub struct NftCreationWorker {
    deps: Arc<WorkerDeps>,
}

impl NftCreationWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn verify_and_create(&self, tweet: &Tweet, job: &MentionJob) -> Result<Option<String>> {
        let text = &tweet.text;
        if !matches_catch_phrase(text, &job.details.tools_catch_phrase) {
            tracing::debug!(tweet_id = %tweet.id, "not a collection launch tweet");
            return Ok(None);
        }

        let name = field_after(text, "collection name").context("missing collection name")?;
        let uri = field_after(text, "collection uri").context("missing collection uri")?;
        let royalty_basis_points: u16 = field_after(text, "royalty")
            .map(|value| value.parse())
            .transpose()
            .context("invalid royalty")?
            .unwrap_or(DEFAULT_ROYALTY_BASIS_POINTS);

        let creators = match tweet.author_id.as_deref() {
            Some(author_id) => vec![NftCreator {
                address: author_id.to_string(),
                percentage: 100,
            }],
            None => Vec::new(),
        };

        let spec = NftCollectionSpec {
            name: name.clone(),
            uri,
            royalty_basis_points,
            creators,
        };
        let kit = self.deps.agent_kits.for_text(text);
        let collection = kit.create_nft_collection(&spec).await?;

        Ok(Some(format!(
            "collection deployed\n- name: {}\n- royalty: {}bps\n- address: {}",
            name, royalty_basis_points, collection
        )))
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::NftCreation,
            NFT_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            match self.verify_and_create(&tweet, job).await {
                Ok(Some(details)) => {
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, details));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(tweet_id = %tweet.id, error = %err, "collection launch failed");
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, FAILURE_REPLY));
                }
            }
            mark_tweet_used(
                &self.deps.cache,
                CapabilityId::NftCreation,
                &tweet.id,
                "collection launch tweet",
            )
            .await;
        }

        mark_checked(&self.deps.cache, CapabilityId::NftCreation).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for NftCreationWorker {
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

    #[tokio::test]
    async fn test_collection_launch_replies_with_address() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet(
            "40",
            "under the rule of @craftybot launch a collection\n\
             collection name Night Birds\n\
             collection uri ipfs://nightbirds\n\
             royalty 250",
        ));
        let rig = testing::rig(social);
        let worker = NftCreationWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        let reply = rig.deps.priority_queue.next().await.unwrap();
        assert!(reply.text.contains("collection-addr"));
        assert!(reply.text.contains("250bps"));
    }

    #[tokio::test]
    async fn test_royalty_defaults_when_absent() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet(
            "41",
            "under the rule of @craftybot launch a collection\n\
             collection name Night Birds\n\
             collection uri ipfs://nightbirds",
        ));
        let rig = testing::rig(social);
        let worker = NftCreationWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        let reply = rig.deps.priority_queue.next().await.unwrap();
        assert!(reply.text.contains("500bps"));
    }
}
