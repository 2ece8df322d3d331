//! Token-creation worker: launches a new agent token on the launchpad from
//! a mention request (metadata upload, then the launch call), and replies
//! with the dashboard link.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, MentionJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::launchpad::{CreateTokenMetadata, CreatedByTwitter, LaunchTokenRequest};
use parakeet_services::Tweet;

use super::parse::{field_after, word_after};
use super::support::{
    fresh_mentions, mark_checked, mark_tweet_used, matches_catch_phrase, WorkerDeps,
};

const CREATION_HOUR_CHECK: f64 = 0.1;
const FAILURE_REPLY: &str =
    "oops! something went wrong with your token launch attempt. please check the request format and try again.";

pub struct TokenCreationWorker {
    deps: Arc<WorkerDeps>,
}

struct LaunchDetails {
    symbol: String,
    mint: Option<String>,
    username: String,
}

impl TokenCreationWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn verify_and_launch(
        &self,
        tweet: &Tweet,
        job: &MentionJob,
    ) -> Result<Option<LaunchDetails>> {
        let text = &tweet.text;
        if !matches_catch_phrase(text, &job.details.tools_catch_phrase) {
            tracing::debug!(tweet_id = %tweet.id, "not a token launch tweet");
            return Ok(None);
        }

        let ticker = word_after(text, "new agent").context("missing ticker")?;
        let description = field_after(text, "who is").context("missing description")?;
        let agent_name = field_after(text, "Agent name:").context("missing agent name")?;

        // Profile picture: explicit link, else the first media attachment.
        let pfp_link = field_after(text, "PFP Link:")
            .or_else(|| tweet.media_keys.first().cloned())
            .context("missing profile picture")?;

        let author_id = tweet.author_id.as_deref().context("tweet has no author")?;
        let author = self.deps.profiles.by_id(author_id, false).await?;

        let (image, mime_type) = self
            .deps
            .social
            .fetch_image(&pfp_link)
            .await
            .context("profile picture fetch failed")?;

        let upload = self
            .deps
            .launchpad
            .upload_metadata(CreateTokenMetadata {
                name: agent_name.clone(),
                symbol: ticker.clone(),
                description: description.clone(),
                file: image,
                mime_type,
                twitter: Some(author.username.clone()),
                telegram: None,
                website: None,
            })
            .await?;

        let launched = self
            .deps
            .launchpad
            .launch_token(&LaunchTokenRequest {
                name: agent_name,
                ticker: ticker.clone(),
                description,
                image: upload.metadata.image.clone(),
                prompt: job.prompt.clone(),
                token_metadata: upload.metadata,
                metadata_uri: upload.metadata_uri,
                created_by: job.handle.clone(),
                created_by_twitter: CreatedByTwitter {
                    username: author.username.clone(),
                    user_id: author.id.clone(),
                    tweet_id: tweet.id.clone(),
                },
            })
            .await?;

        Ok(Some(LaunchDetails {
            symbol: ticker,
            mint: launched
                .get("mint")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            username: author.username,
        }))
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::TokenCreation,
            CREATION_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            match self.verify_and_launch(&tweet, job).await {
                Ok(Some(details)) => {
                    let dashboard = details
                        .mint
                        .map(|mint| format!("\ndashboard: /{}", mint))
                        .unwrap_or_default();
                    self.deps.priority_queue.push(ReplyJob::text(
                        &tweet.id,
                        format!(
                            "@{} {} is live{}",
                            details.username, details.symbol, dashboard
                        ),
                    ));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(tweet_id = %tweet.id, error = %err, "token launch failed");
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, FAILURE_REPLY));
                }
            }
            mark_tweet_used(
                &self.deps.cache,
                CapabilityId::TokenCreation,
                &tweet.id,
                "token launch tweet",
            )
            .await;
        }

        mark_checked(&self.deps.cache, CapabilityId::TokenCreation).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for TokenCreationWorker {
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
    async fn test_malformed_launch_gets_failure_reply() {
        // Launchpad is unreachable in tests, so only the parse failure path
        // runs to completion deterministically.
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet(
            "30",
            "under the rule of @craftybot new agent", // no fields
        ));
        let rig = testing::rig(social);
        let worker = TokenCreationWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        let reply = rig.deps.priority_queue.next().await.unwrap();
        assert_eq!(reply.text, FAILURE_REPLY);
    }

    #[tokio::test]
    async fn test_non_matching_tweet_skipped() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet("31", "hello friend"));
        let rig = testing::rig(social);
        let worker = TokenCreationWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        assert!(rig.deps.priority_queue.is_empty());
    }
}
