//! Language model completion client.
//!
//! One call shape for the whole bot: a system prompt (the registered
//! persona prompt plus a constant footer enforcing post constraints) and a
//! list of user context blocks, optionally with an attached image URL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use parakeet_core::config::LlmConfig;

const COMPLETION_FOOTER: &str =
    "\n\nNote: Keep your post under 100 characters, use no emojis, no hashtags and keep everything lowercase.";

/// One user turn of context for a completion.
#[derive(Debug, Clone)]
pub struct ContextMessage {
    pub text: String,
    pub image_url: Option<String>,
}

impl ContextMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_url: None,
        }
    }

    pub fn with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_url: Some(image_url.into()),
        }
    }
}

/// A callable tool offered to the model.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A tool call the model decided to make.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    /// JSON-encoded arguments, exactly as returned by the model.
    pub arguments: String,
}

#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Plain completion; returns the generated text (empty when the model
    /// returned no content).
    async fn complete(&self, prompt: &str, context: &[ContextMessage]) -> Result<String>;

    /// Completion with tool definitions; the model may answer with text,
    /// tool calls, or both.
    async fn complete_with_tools(
        &self,
        prompt: &str,
        context: &[ContextMessage],
        tools: &[ToolSpec],
    ) -> Result<Completion>;
}

// Chat completions API request/response structures
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionDefinition,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<RawToolCall>>,
}

#[derive(Debug, Deserialize)]
struct RawToolCall {
    function: RawFunctionCall,
}

#[derive(Debug, Deserialize)]
struct RawFunctionCall {
    name: String,
    arguments: String,
}

/// Chat-completions client for an OpenAI-compatible API.
pub struct OpenAiChat {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(config: &LlmConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the language model")?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn build_messages(prompt: &str, context: &[ContextMessage]) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: MessageContent::Text(format!("{}{}", prompt, COMPLETION_FOOTER)),
        }];
        for turn in context {
            let content = match &turn.image_url {
                Some(url) => MessageContent::Blocks(vec![
                    ContentBlock::Text {
                        text: turn.text.clone(),
                    },
                    ContentBlock::ImageUrl {
                        image_url: ImageUrl {
                            url: url.clone(),
                            detail: "low",
                        },
                    },
                ]),
                None => MessageContent::Text(turn.text.clone()),
            };
            messages.push(ChatMessage {
                role: "user",
                content,
            });
        }
        messages
    }

    async fn request(&self, body: &ChatRequest) -> Result<ChoiceMessage> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .context("Completion request failed")?
            .error_for_status()
            .context("Completion request rejected")?;

        let mut parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to decode completion response")?;
        if parsed.choices.is_empty() {
            anyhow::bail!("completion response contained no choices");
        }
        Ok(parsed.choices.remove(0).message)
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, prompt: &str, context: &[ContextMessage]) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: Self::build_messages(prompt, context),
            tools: None,
        };
        let message = self.request(&body).await?;
        Ok(message.content.unwrap_or_default())
    }

    async fn complete_with_tools(
        &self,
        prompt: &str,
        context: &[ContextMessage],
        tools: &[ToolSpec],
    ) -> Result<Completion> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: Self::build_messages(prompt, context),
            tools: Some(
                tools
                    .iter()
                    .map(|t| ToolDefinition {
                        kind: "function",
                        function: FunctionDefinition {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.parameters.clone(),
                        },
                    })
                    .collect(),
            ),
        };
        let message = self.request(&body).await?;
        Ok(Completion {
            content: message.content,
            tool_calls: message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|c| ToolInvocation {
                    name: c.function.name,
                    arguments: c.function.arguments,
                })
                .collect(),
        })
    }
}
