//! Slack adapter: credential check at init, channel broadcast, and
//! model-generated responses to messages that mention the bot.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use parakeet_core::models::SlackConfig;

use crate::llm::{ContextMessage, LanguageModel};
use crate::notify::{ASSISTANT_PROMPT, FALLBACK_RESPONSE};

const API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct SlackAck {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackAdapter {
    http: reqwest::Client,
    token: String,
    channels: Vec<String>,
    llm: Arc<dyn LanguageModel>,
}

impl SlackAdapter {
    pub fn new(
        config: &SlackConfig,
        llm: Arc<dyn LanguageModel>,
        timeout: Duration,
    ) -> Result<Self> {
        let token = config
            .resolve_api_key()
            .context("Slack API key is not configured")?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for Slack")?;
        Ok(Self {
            http,
            token,
            channels: config.channels.clone(),
            llm,
        })
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<()> {
        let ack: SlackAck = self
            .http
            .post(format!("{}/{}", API_BASE, method))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Slack {} request failed", method))?
            .error_for_status()
            .with_context(|| format!("Slack {} request rejected", method))?
            .json()
            .await
            .with_context(|| format!("Failed to decode Slack {} response", method))?;
        if !ack.ok {
            anyhow::bail!(
                "Slack {} returned error: {}",
                method,
                ack.error.unwrap_or_else(|| "unknown".to_string())
            );
        }
        Ok(())
    }

    /// Verify the token against the Slack API.
    pub async fn init(&self) -> Result<()> {
        self.call("auth.test", serde_json::json!({})).await?;
        tracing::info!("Connected to Slack");
        Ok(())
    }

    /// Generate a response for an inbound message that mentioned the bot.
    pub async fn respond(&self, message: &str) -> String {
        match self
            .llm
            .complete(ASSISTANT_PROMPT, &[ContextMessage::text(message)])
            .await
        {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => FALLBACK_RESPONSE.to_string(),
            Err(err) => {
                tracing::error!(error = %err, "Slack response generation failed");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    pub async fn send_message(&self, channel: &str, text: &str) -> Result<()> {
        self.call(
            "chat.postMessage",
            serde_json::json!({ "channel": channel, "text": text }),
        )
        .await?;
        tracing::info!(channel = %channel, "Message sent to Slack channel");
        Ok(())
    }

    /// Send to every configured channel; failures are logged per channel.
    pub async fn broadcast(&self, text: &str) {
        for channel in &self.channels {
            if let Err(err) = self.send_message(channel, text).await {
                tracing::error!(channel = %channel, error = %err, "Slack broadcast failed");
            }
        }
    }
}
