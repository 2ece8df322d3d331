//! GitHub issue creation for tweet-sourced feature requests and bug reports.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use parakeet_core::models::GithubConfig;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("parakeet/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct IssueBody<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
}

pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_api_base(API_BASE, timeout)
    }

    pub fn with_api_base(api_base: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client for GitHub")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn create_issue(
        &self,
        config: &GithubConfig,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<CreatedIssue> {
        let token = config
            .resolve_token()
            .context("GitHub auth token is not configured")?;
        self.http
            .post(format!(
                "{}/repos/{}/{}/issues",
                self.api_base, config.owner, config.repo
            ))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&IssueBody {
                title,
                body,
                labels,
            })
            .send()
            .await
            .context("Issue creation failed")?
            .error_for_status()
            .context("Issue creation rejected")?
            .json()
            .await
            .context("Failed to decode issue creation response")
    }
}
