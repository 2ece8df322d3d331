//! Token launchpad client: metadata upload to the IPFS gateway, then the
//! launch call that mints the token and creates its dashboard entry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use parakeet_core::config::LaunchpadConfig;

/// Multipart payload for the metadata upload.
#[derive(Debug, Clone)]
pub struct CreateTokenMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub file: Vec<u8>,
    pub mime_type: String,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "showName", default)]
    pub show_name: bool,
    #[serde(rename = "createdOn", default)]
    pub created_on: String,
    #[serde(default)]
    pub twitter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataUpload {
    pub metadata: TokenMetadata,
    #[serde(rename = "metadataUri")]
    pub metadata_uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedByTwitter {
    pub username: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "tweetId")]
    pub tweet_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchTokenRequest {
    pub name: String,
    pub ticker: String,
    pub description: String,
    pub image: String,
    pub prompt: String,
    #[serde(rename = "tokenMetadata")]
    pub token_metadata: TokenMetadata,
    #[serde(rename = "metadataUri")]
    pub metadata_uri: String,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(rename = "createdByTwitter")]
    pub created_by_twitter: CreatedByTwitter,
}

pub struct LaunchpadClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    metadata_endpoint: String,
}

impl LaunchpadClient {
    pub fn new(config: &LaunchpadConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the launchpad")?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            metadata_endpoint: config.metadata_endpoint.clone(),
        })
    }

    /// Upload token metadata and image; returns the hosted metadata URI.
    pub async fn upload_metadata(&self, create: CreateTokenMetadata) -> Result<MetadataUpload> {
        let file_part = reqwest::multipart::Part::bytes(create.file)
            .file_name("token.png")
            .mime_str(&create.mime_type)
            .context("Invalid token image mime type")?;
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("name", create.name)
            .text("symbol", create.symbol)
            .text("description", create.description)
            .text("twitter", create.twitter.unwrap_or_default())
            .text("telegram", create.telegram.unwrap_or_default())
            .text("website", create.website.unwrap_or_default())
            .text("showName", "true");

        self.http
            .post(&self.metadata_endpoint)
            .multipart(form)
            .send()
            .await
            .context("Token metadata upload failed")?
            .error_for_status()
            .context("Token metadata upload rejected")?
            .json()
            .await
            .context("Failed to decode token metadata response")
    }

    /// Launch the token; the launchpad mints it and returns the created entry.
    pub async fn launch_token(&self, request: &LaunchTokenRequest) -> Result<serde_json::Value> {
        let mut call = self
            .http
            .post(format!("{}/hooks/launch-token", self.api_base))
            .json(request);
        if let Some(key) = &self.api_key {
            call = call.header("x-api-key", key);
        }
        call.send()
            .await
            .context("Token launch failed")?
            .error_for_status()
            .context("Token launch rejected")?
            .json()
            .await
            .context("Failed to decode token launch response")
    }
}
