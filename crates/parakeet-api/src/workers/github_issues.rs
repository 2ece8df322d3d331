//! GitHub worker: lets the model triage mentions into feature requests or
//! bug reports, files the issue, and replies with the link.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use parakeet_core::models::{CapabilityId, GithubConfig, MentionJob, ReplyJob};
use parakeet_queue::{LaneContext, Worker};
use parakeet_services::{ToolSpec, Tweet};

use super::support::{fresh_mentions, mark_checked, mark_tweet_used, tweet_context, WorkerDeps};

const GITHUB_HOUR_CHECK: f64 = 0.02;
const TRIAGE_PROMPT: &str =
    "Decide whether the user is asking to file a feature request or report a bug, and call the matching tool. If neither applies, do nothing.";
const BOT_LABEL: &str = "parakeet-bot";

/// Arguments both tools share.
#[derive(Debug, Deserialize)]
struct IssueArgs {
    title: String,
    description: String,
    #[serde(default)]
    tags: String,
}

fn triage_tools() -> Vec<ToolSpec> {
    let parameters = serde_json::json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "suitable title for the issue"
            },
            "description": {
                "type": "string",
                "description": "brief description of what the user needs or is reporting"
            },
            "tags": {
                "type": "string",
                "description": "comma separated tags for the issue"
            }
        },
        "required": ["title", "description"]
    });
    vec![
        ToolSpec {
            name: "feature_request".to_string(),
            description: "Use this function to create a new feature request in the project repo"
                .to_string(),
            parameters: parameters.clone(),
        },
        ToolSpec {
            name: "bug_report".to_string(),
            description: "Use this function when the user reports a new bug".to_string(),
            parameters,
        },
    ]
}

pub struct GithubIssuesWorker {
    deps: Arc<WorkerDeps>,
    tools: Vec<ToolSpec>,
}

impl GithubIssuesWorker {
    pub fn new(deps: Arc<WorkerDeps>) -> Self {
        Self {
            deps,
            tools: triage_tools(),
        }
    }

    async fn file_issue(
        &self,
        config: &GithubConfig,
        kind: &str,
        args: &IssueArgs,
        tweet: &Tweet,
    ) -> Result<String> {
        let prefix = match kind {
            "bug_report" => "[BUG]",
            _ => "[FR]",
        };
        let mut labels = vec![BOT_LABEL.to_string()];
        labels.extend(
            args.tags
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string),
        );
        let body = format!(
            "{}\n\nIssue created from post https://x.com/i/status/{}",
            args.description, tweet.id
        );

        let issue = self
            .deps
            .github
            .create_issue(
                config,
                &format!("{} {}", prefix, args.title),
                &body,
                &labels,
            )
            .await?;
        Ok(issue.html_url)
    }

    async fn handle_mention(&self, tweet: &Tweet, config: &GithubConfig) -> Result<()> {
        let completion = self
            .deps
            .llm
            .complete_with_tools(TRIAGE_PROMPT, &tweet_context(tweet), &self.tools)
            .await?;

        for call in completion.tool_calls {
            let args: IssueArgs = serde_json::from_str(&call.arguments)
                .context("tool call arguments did not parse")?;
            let url = self.file_issue(config, &call.name, &args, tweet).await?;
            tracing::info!(tweet_id = %tweet.id, url = %url, "issue filed");
            self.deps.priority_queue.push(ReplyJob::text(
                &tweet.id,
                format!("thanks for the report, tracked here: {}", url),
            ));
        }
        Ok(())
    }

    async fn scan(&self, job: &MentionJob) -> Result<()> {
        let Some(config) = job.details.github.as_ref() else {
            tracing::debug!("registration has no github config");
            return Ok(());
        };

        let Some((_profile, tweets)) = fresh_mentions(
            &self.deps,
            CapabilityId::Github,
            GITHUB_HOUR_CHECK,
            &job.handle,
        )
        .await?
        else {
            return Ok(());
        };

        for tweet in tweets {
            if let Err(err) = self.handle_mention(&tweet, config).await {
                tracing::error!(tweet_id = %tweet.id, error = %err, "issue triage failed");
            }
            mark_tweet_used(&self.deps.cache, CapabilityId::Github, &tweet.id, "triaged").await;
        }

        mark_checked(&self.deps.cache, CapabilityId::Github).await;
        Ok(())
    }
}

#[async_trait]
impl Worker<MentionJob> for GithubIssuesWorker {
    async fn poll(&self, job: MentionJob, _ctx: &LaneContext<MentionJob>) -> Result<()> {
        self.scan(&job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::testing;
    use parakeet_services::ToolInvocation;

    fn job() -> MentionJob {
        let details: parakeet_core::models::RegisterDetails =
            serde_json::from_value(serde_json::json!({
                "metadata": { "handle": "craftybot" },
                "prompt": ["post about ai"],
                "replies_prompt": "reply kindly",
                "github": {
                    "owner": "octo",
                    "repo": "widgets",
                    "auth_token": "ghp_test"
                }
            }))
            .unwrap();
        MentionJob {
            handle: "craftybot".to_string(),
            prompt: details.replies_prompt.clone(),
            details,
        }
    }

    #[test]
    fn test_triage_tools_shape() {
        let tools = triage_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "feature_request");
        assert_eq!(tools[1].name, "bug_report");
        assert_eq!(tools[0].parameters["required"][0], "title");
    }

    #[test]
    fn test_issue_args_parse_with_optional_tags() {
        let args: IssueArgs =
            serde_json::from_str(r#"{"title":"t","description":"d"}"#).unwrap();
        assert!(args.tags.is_empty());
    }

    #[tokio::test]
    async fn test_no_tool_call_files_nothing() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet("20", "love the project"));
        let rig = testing::rig(social);
        let worker = GithubIssuesWorker::new(rig.deps.clone());

        worker.scan(&job()).await.unwrap();

        assert!(rig.deps.priority_queue.is_empty());
        // Still marked as handled.
        assert!(
            crate::workers::support::tweet_already_used(
                &rig.deps.cache,
                CapabilityId::Github,
                "20"
            )
            .await
        );
    }

    #[tokio::test]
    async fn test_unparsable_tool_arguments_are_isolated() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet("21", "the widget button is broken"));
        let llm = testing::MockLlm::default();
        llm.tool_calls.lock().unwrap().push(ToolInvocation {
            name: "bug_report".to_string(),
            arguments: "not json".to_string(),
        });
        let rig = testing::rig_with(social, llm, testing::MockKit::default());
        let worker = GithubIssuesWorker::new(rig.deps.clone());

        // The triage failure is logged, not propagated.
        worker.scan(&job()).await.unwrap();
        assert!(rig.deps.priority_queue.is_empty());
    }
}
