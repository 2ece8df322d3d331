//! Alexa skill adapter.
//!
//! The skill endpoint itself is hosted by the platform; this adapter owns
//! the voice-response generation the skill handlers call into. `init`
//! exercises the launch path so a misconfigured skill fails at
//! registration time instead of on the first utterance.

use std::sync::Arc;

use anyhow::{Context, Result};

use parakeet_core::models::AlexaConfig;

use crate::llm::{ContextMessage, LanguageModel};
use crate::notify::FALLBACK_RESPONSE;

const VOICE_PROMPT: &str =
    "You are a helpful AI assistant. Respond helpfully but with personality. Keep responses concise and clear for voice:";

pub struct AlexaAdapter {
    invocation_name: String,
    skill_id: String,
    llm: Arc<dyn LanguageModel>,
}

impl AlexaAdapter {
    pub fn new(config: &AlexaConfig, llm: Arc<dyn LanguageModel>) -> Result<Self> {
        if config.skill_id.trim().is_empty() {
            anyhow::bail!("Alexa skill id is not configured");
        }
        let invocation_name = if config.invocation_name.trim().is_empty() {
            "parakeet".to_string()
        } else {
            config.invocation_name.clone()
        };
        Ok(Self {
            invocation_name,
            skill_id: config.skill_id.clone(),
            llm,
        })
    }

    pub fn invocation_name(&self) -> &str {
        &self.invocation_name
    }

    pub fn skill_id(&self) -> &str {
        &self.skill_id
    }

    /// Exercise the launch path once.
    pub async fn init(&self) -> Result<()> {
        let greeting = self.launch_response();
        if greeting.is_empty() {
            anyhow::bail!("Alexa launch response is empty");
        }
        tracing::info!(skill_id = %self.skill_id, "Alexa skill initialized");
        Ok(())
    }

    /// Speech for the skill's launch request.
    pub fn launch_response(&self) -> String {
        format!(
            "Welcome to {}! How can I help you today?",
            self.invocation_name
        )
    }

    /// Speech for a query intent.
    pub async fn intent_response(&self, query: &str) -> String {
        match self
            .llm
            .complete(VOICE_PROMPT, &[ContextMessage::text(query)])
            .await
            .context("Alexa response generation failed")
        {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => FALLBACK_RESPONSE.to_string(),
            Err(err) => {
                tracing::error!(error = %err, "Alexa response generation failed");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }
}
