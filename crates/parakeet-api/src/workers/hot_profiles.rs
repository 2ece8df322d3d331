//! Hot-profiles worker: watches a set of registered profiles and comments
//! on their recent posts. Each watched profile is one heartbeat item, so
//! the profiles take turns through the lane.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use parakeet_core::models::{CapabilityId, HotProfileJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};

use super::support::{
    mark_tweet_used, tweet_already_used, tweet_context, WorkerDeps, DEFAULT_REPLY_TEXT,
};

const TIMELINE_FETCH: u32 = 5;

pub struct HotProfilesWorker {
    deps: Arc<WorkerDeps>,
}

impl HotProfilesWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn comment_on_profile(&self, job: &HotProfileJob) -> Result<()> {
        let profile = self.deps.profiles.by_username(&job.handle, false).await?;
        let timeline = self
            .deps
            .social
            .user_timeline(&profile.id, TIMELINE_FETCH)
            .await
            .context("profile timeline fetch failed")?;

        for tweet in timeline {
            if tweet_already_used(&self.deps.cache, CapabilityId::HotProfiles, &tweet.id).await {
                continue;
            }

            let generated = self
                .deps
                .llm
                .complete(&job.prompt, &tweet_context(&tweet))
                .await;
            match generated {
                Ok(text) => {
                    let text = if text.is_empty() {
                        DEFAULT_REPLY_TEXT.to_string()
                    } else {
                        text
                    };
                    let reply = ReplyJob::text(&tweet.id, text);
                    let note = serde_json::to_string(&reply).unwrap_or_default();
                    tracing::debug!(
                        handle = %job.handle,
                        tweet_id = %tweet.id,
                        "queueing hot-profile comment"
                    );
                    self.deps.reply_queue.push(reply);
                    mark_tweet_used(&self.deps.cache, CapabilityId::HotProfiles, &tweet.id, &note)
                        .await;
                }
                Err(err) => {
                    tracing::error!(
                        handle = %job.handle,
                        tweet_id = %tweet.id,
                        error = %err,
                        "comment generation failed"
                    );
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Worker<HotProfileJob> for HotProfilesWorker {
    async fn poll(&self, job: HotProfileJob, _ctx: &LaneContext<HotProfileJob>) -> Result<()> {
        self.comment_on_profile(&job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::testing;

    fn job() -> HotProfileJob {
        HotProfileJob {
            name: "Notable".to_string(),
            handle: "notable".to_string(),
            description: "a notable account".to_string(),
            prompt: "comment thoughtfully".to_string(),
        }
    }

    #[tokio::test]
    async fn test_comments_on_fresh_posts() {
        let social = testing::MockSocial::default();
        social.push_timeline(testing::tweet("t1", "first post"));
        social.push_timeline(testing::tweet("t2", "second post"));
        let rig = testing::rig(social);
        let worker = HotProfilesWorker::new(rig.deps.clone());

        worker.comment_on_profile(&job()).await.unwrap();

        assert_eq!(rig.deps.reply_queue.len(), 2);
        let first = rig.deps.reply_queue.next().await.unwrap();
        assert_eq!(first.tweet_id, "t1");
        assert_eq!(first.text, "mock reply");
    }

    #[tokio::test]
    async fn test_does_not_comment_twice() {
        let social = testing::MockSocial::default();
        social.push_timeline(testing::tweet("t1", "first post"));
        let rig = testing::rig(social);
        let worker = HotProfilesWorker::new(rig.deps.clone());

        worker.comment_on_profile(&job()).await.unwrap();
        worker.comment_on_profile(&job()).await.unwrap();

        assert_eq!(rig.deps.reply_queue.len(), 1);
    }
}
