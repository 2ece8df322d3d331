//! Chat platform adapters (Slack, Discord, Alexa).
//!
//! Each adapter is constructed from a registration payload, verifies its
//! credentials in `init`, and delivers outbound messages. Initialization
//! failures are isolated per adapter: the registration handler logs them
//! and continues with the remaining capabilities.

pub mod alexa;
pub mod discord;
pub mod slack;

pub use alexa::AlexaAdapter;
pub use discord::DiscordAdapter;
pub use slack::SlackAdapter;

/// System prompt shared by the conversational adapters.
pub(crate) const ASSISTANT_PROMPT: &str =
    "You are a helpful AI assistant. Respond helpfully but with personality. Keep responses concise and clear:";

/// Fallback when the model produced no usable response.
pub(crate) const FALLBACK_RESPONSE: &str = "I'm having trouble processing that request.";
