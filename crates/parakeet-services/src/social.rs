//! Social platform client.
//!
//! The workers only need a handful of calls: profile lookup, the two
//! timelines, posting, and media upload. The trait keeps the workers
//! testable; [`TwitterApi`] is the production implementation against the
//! platform's v2 REST API (v1.1 for media upload).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use parakeet_core::config::SocialConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub followers_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencedTweet {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// A timeline entry, flattened from the wire shape.
#[derive(Debug, Clone)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub referenced_tweets: Vec<ReferencedTweet>,
    pub media_keys: Vec<String>,
}

impl Tweet {
    /// The quoted tweet id, when this entry is a quote tweet.
    pub fn quoted_tweet_id(&self) -> Option<&str> {
        self.referenced_tweets
            .iter()
            .find(|r| r.kind == "quoted")
            .map(|r| r.id.as_str())
    }
}

#[async_trait]
pub trait SocialPlatform: Send + Sync {
    async fn user_by_username(&self, username: &str) -> Result<UserProfile>;
    async fn user_by_id(&self, user_id: &str) -> Result<UserProfile>;
    /// Tweets mentioning the user, newest first.
    async fn mention_timeline(&self, user_id: &str) -> Result<Vec<Tweet>>;
    /// The user's own tweets, newest first.
    async fn user_timeline(&self, user_id: &str, max_results: u32) -> Result<Vec<Tweet>>;
    /// Post a tweet; returns its id.
    async fn post_tweet(&self, text: &str) -> Result<String>;
    /// Reply to a tweet, optionally with uploaded media; returns the reply id.
    async fn post_reply(&self, text: &str, in_reply_to: &str, media_ids: &[String])
        -> Result<String>;
    /// Upload media bytes; returns the platform media id.
    async fn upload_media(&self, bytes: Vec<u8>, mime_type: &str) -> Result<String>;
    /// Fetch an image from an arbitrary URL; returns bytes and content type.
    async fn fetch_image(&self, url: &str) -> Result<(Vec<u8>, String)>;
}

// Wire shapes

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TimelineEnvelope {
    #[serde(default)]
    data: Option<Vec<RawTweet>>,
}

#[derive(Debug, Deserialize)]
struct RawTweet {
    id: String,
    text: String,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    referenced_tweets: Option<Vec<ReferencedTweet>>,
    #[serde(default)]
    attachments: Option<RawAttachments>,
}

#[derive(Debug, Deserialize)]
struct RawAttachments {
    #[serde(default)]
    media_keys: Vec<String>,
}

impl From<RawTweet> for Tweet {
    fn from(raw: RawTweet) -> Self {
        Tweet {
            id: raw.id,
            text: raw.text,
            author_id: raw.author_id,
            referenced_tweets: raw.referenced_tweets.unwrap_or_default(),
            media_keys: raw
                .attachments
                .map(|a| a.media_keys)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PostTweetBody<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ReplyRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<MediaRef<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplyRef<'a> {
    in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Serialize)]
struct MediaRef<'a> {
    media_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
struct PostedTweet {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UploadedMedia {
    media_id_string: String,
}

const TWEET_FIELDS: &str = "referenced_tweets,attachments,author_id";
const TIMELINE_EXPANSIONS: &str =
    "attachments.media_keys,author_id,referenced_tweets.id,entities.mentions.username";

pub struct TwitterApi {
    http: reqwest::Client,
    api_base: String,
    upload_base: String,
    bearer_token: String,
}

impl TwitterApi {
    pub fn new(config: &SocialConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the social platform")?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        self.http
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .context("Social platform request failed")?
            .error_for_status()
            .context("Social platform request rejected")?
            .json()
            .await
            .context("Failed to decode social platform response")
    }
}

#[async_trait]
impl SocialPlatform for TwitterApi {
    async fn user_by_username(&self, username: &str) -> Result<UserProfile> {
        let envelope: Envelope<UserProfile> = self
            .get_json(format!(
                "{}/2/users/by/username/{}?user.fields=public_metrics",
                self.api_base, username
            ))
            .await?;
        Ok(envelope.data)
    }

    async fn user_by_id(&self, user_id: &str) -> Result<UserProfile> {
        let envelope: Envelope<UserProfile> = self
            .get_json(format!(
                "{}/2/users/{}?user.fields=public_metrics",
                self.api_base, user_id
            ))
            .await?;
        Ok(envelope.data)
    }

    async fn mention_timeline(&self, user_id: &str) -> Result<Vec<Tweet>> {
        let envelope: TimelineEnvelope = self
            .get_json(format!(
                "{}/2/users/{}/mentions?expansions={}&tweet.fields={}",
                self.api_base, user_id, TIMELINE_EXPANSIONS, TWEET_FIELDS
            ))
            .await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Tweet::from)
            .collect())
    }

    async fn user_timeline(&self, user_id: &str, max_results: u32) -> Result<Vec<Tweet>> {
        let envelope: TimelineEnvelope = self
            .get_json(format!(
                "{}/2/users/{}/tweets?max_results={}&expansions=attachments.media_keys&tweet.fields={}",
                self.api_base, user_id, max_results, TWEET_FIELDS
            ))
            .await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Tweet::from)
            .collect())
    }

    async fn post_tweet(&self, text: &str) -> Result<String> {
        let body = PostTweetBody {
            text,
            reply: None,
            media: None,
        };
        let envelope: Envelope<PostedTweet> = self
            .http
            .post(format!("{}/2/tweets", self.api_base))
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await
            .context("Tweet post failed")?
            .error_for_status()
            .context("Tweet post rejected")?
            .json()
            .await
            .context("Failed to decode tweet post response")?;
        Ok(envelope.data.id)
    }

    async fn post_reply(
        &self,
        text: &str,
        in_reply_to: &str,
        media_ids: &[String],
    ) -> Result<String> {
        let body = PostTweetBody {
            text,
            reply: Some(ReplyRef {
                in_reply_to_tweet_id: in_reply_to,
            }),
            media: (!media_ids.is_empty()).then_some(MediaRef { media_ids }),
        };
        let envelope: Envelope<PostedTweet> = self
            .http
            .post(format!("{}/2/tweets", self.api_base))
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await
            .context("Reply post failed")?
            .error_for_status()
            .context("Reply post rejected")?
            .json()
            .await
            .context("Failed to decode reply post response")?;
        Ok(envelope.data.id)
    }

    async fn upload_media(&self, bytes: Vec<u8>, mime_type: &str) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .mime_str(mime_type)
            .context("Invalid media mime type")?;
        let form = reqwest::multipart::Form::new().part("media", part);
        let uploaded: UploadedMedia = self
            .http
            .post(format!("{}/1.1/media/upload.json", self.upload_base))
            .bearer_auth(&self.bearer_token)
            .multipart(form)
            .send()
            .await
            .context("Media upload failed")?
            .error_for_status()
            .context("Media upload rejected")?
            .json()
            .await
            .context("Failed to decode media upload response")?;
        Ok(uploaded.media_id_string)
    }

    async fn fetch_image(&self, url: &str) -> Result<(Vec<u8>, String)> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Image fetch failed")?
            .error_for_status()
            .context("Image fetch rejected")?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .context("Failed to read image bytes")?;
        Ok((bytes.to_vec(), content_type))
    }
}
