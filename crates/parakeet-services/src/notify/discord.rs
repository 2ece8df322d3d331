//! Discord adapter: bot-token credential check and channel messages.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use parakeet_core::models::DiscordConfig;

use crate::llm::{ContextMessage, LanguageModel};
use crate::notify::{ASSISTANT_PROMPT, FALLBACK_RESPONSE};

const API_BASE: &str = "https://discord.com/api/v10";

pub struct DiscordAdapter {
    http: reqwest::Client,
    token: String,
    channels: Vec<String>,
    llm: Arc<dyn LanguageModel>,
}

impl DiscordAdapter {
    pub fn new(
        config: &DiscordConfig,
        llm: Arc<dyn LanguageModel>,
        timeout: Duration,
    ) -> Result<Self> {
        let token = config
            .resolve_token()
            .context("Discord token is not configured")?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for Discord")?;
        Ok(Self {
            http,
            token,
            channels: config.channels.clone(),
            llm,
        })
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Verify the bot token.
    pub async fn init(&self) -> Result<()> {
        self.http
            .get(format!("{}/users/@me", API_BASE))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .context("Discord identity request failed")?
            .error_for_status()
            .context("Discord token rejected")?;
        tracing::info!("Connected to Discord");
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
                tracing::error!(error = %err, "Discord response generation failed");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    pub async fn send_message(&self, channel_id: &str, content: &str) -> Result<()> {
        self.http
            .post(format!("{}/channels/{}/messages", API_BASE, channel_id))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .context("Discord message send failed")?
            .error_for_status()
            .context("Discord message rejected")?;
        tracing::info!(channel = %channel_id, "Message sent to Discord channel");
        Ok(())
    }

    /// Send to every configured channel; failures are logged per channel.
    pub async fn broadcast(&self, content: &str) {
        for channel in &self.channels {
            if let Err(err) = self.send_message(channel, content).await {
                tracing::error!(channel = %channel, error = %err, "Discord broadcast failed");
            }
        }
    }
}
