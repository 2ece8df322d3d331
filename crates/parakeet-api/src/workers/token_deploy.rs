//! Token-deploy worker: deploys a fresh SPL token from a mention request.

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

const DEPLOY_HOUR_CHECK: f64 = 0.02;
const FAILURE_REPLY: &str =
    "oops! something went wrong with your token deploy attempt. please check the request format and try again.";

pub struct TokenDeployWorker {
    deps: Arc<WorkerDeps>,
}

impl TokenDeployWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self { deps }
    }

    async fn verify_and_deploy(&self, tweet: &Tweet, job: &MentionJob) -> Result<Option<String>> {
        let text = &tweet.text;
        if !matches_catch_phrase(text, &job.details.tools_catch_phrase) {
            tracing::debug!(tweet_id = %tweet.id, "not a token deploy tweet");
            return Ok(None);
        }

        let name = field_after(text, "name").context("missing name")?;
        let uri = field_after(text, "uri").context("missing uri")?;
        let symbol = field_after(text, "symbol").context("missing symbol")?;
        let decimals: u8 = field_after(text, "decimals")
            .context("missing decimals")?
            .parse()
            .context("invalid decimals")?;
        let initial_supply: u64 = field_after(text, "initialSupply")
            .context("missing initialSupply")?
            .parse()
            .context("invalid initialSupply")?;

        let kit = self.deps.agent_kits.for_text(text);
        let mint = kit
            .deploy_token(&name, &uri, &symbol, decimals, initial_supply)
            .await?;

        Ok(Some(format!(
            "token deployed\n- name: {}\n- symbol: {}\n- decimals: {}\n- initial supply: {}\n- mint: {}",
            name, symbol, decimals, initial_supply, mint
        )))
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::TokenDeploy,
            DEPLOY_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            match self.verify_and_deploy(&tweet, job).await {
                Ok(Some(details)) => {
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, details));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(tweet_id = %tweet.id, error = %err, "token deploy failed");
                    self.deps
                        .priority_queue
                        .push(ReplyJob::text(&tweet.id, FAILURE_REPLY));
                }
            }
            mark_tweet_used(
                &self.deps.cache,
                CapabilityId::TokenDeploy,
                &tweet.id,
                "token deploy tweet",
            )
            .await;
        }

        mark_checked(&self.deps.cache, CapabilityId::TokenDeploy).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for TokenDeployWorker {
    async fn poll(&self, job: MentionJob, _ctx: &LaneContext<MentionJob>) -> Result<()> {
        self.scan(&job).await
    }
}
