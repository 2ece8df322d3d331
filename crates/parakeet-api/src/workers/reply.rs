//! Reply worker: posts queued replies, optionally with an image.
//!
//! Serves both the reply and priority-reply lanes. Items here are real
//! one-shot work (no heartbeat recycle). A failed post pauses the lane and
//! re-enqueues the job, so it is retried after the next scheduled reset.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use parakeet_core::models::ReplyJob;
use parakeet_core::util::random_item;
use parakeet_queue::{LaneContext, Worker};

use super::support::WorkerDeps;

pub struct ReplyWorker {
    deps: Arc<WorkerDeps>,
}

impl ReplyWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    /// Resolve and upload the job's image, if any. Media failures degrade to
    /// a plain text reply.
    async fn upload_media(&self, job: &ReplyJob) -> Vec<String> {
        if !job.send_image {
            return Vec::new();
        }
        let link = if job.random_image {
            random_item(&job.image_links).cloned()
        } else {
            job.image_link.clone()
        };
        let Some(link) = link else {
            return Vec::new();
        };

        let uploaded = async {
            let (bytes, mime_type) = self.deps.social.fetch_image(&link).await?;
            self.deps.social.upload_media(bytes, &mime_type).await
        }
        .await;

        match uploaded {
            Ok(media_id) => {
                tracing::info!(media_id = %media_id, "uploaded media for reply");
                vec![media_id]
            }
            Err(err) => {
                tracing::error!(error = %err, "media upload failed, replying without media");
                Vec::new()
            }
        }
    }

    async fn send_reply(&self, job: ReplyJob, ctx: &LaneContext<ReplyJob>) {
        let media_ids = self.upload_media(&job).await;

        match self
            .deps
            .social
            .post_reply(&job.text, &job.tweet_id, &media_ids)
            .await
        {
            Ok(reply_id) => {
                tracing::info!(
                    lane = %ctx.id(),
                    tweet_id = %job.tweet_id,
                    reply_id = %reply_id,
                    "reply posted"
                );
            }
            Err(err) => {
                tracing::warn!(
                    lane = %ctx.id(),
                    tweet_id = %job.tweet_id,
                    error = %err,
                    "reply failed, pausing lane and requeueing the job"
                );
                ctx.queue().pause();
                ctx.queue().push(job);
            }
        }
    }
}

#[async_trait]
impl Worker<ReplyJob> for ReplyWorker {
    async fn poll(&self, job: ReplyJob, ctx: &LaneContext<ReplyJob>) -> Result<()> {
        tracing::debug!(lane = %ctx.id(), tweet_id = %job.tweet_id, "reply job dequeued");
        self.send_reply(job, ctx).await;
        Ok(())
    }

    fn recycle(&self) -> bool {
        false
    }
}
