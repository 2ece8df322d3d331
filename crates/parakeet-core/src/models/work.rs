//! Work items carried by the capability lanes.
//!
//! Reply jobs are real one-shot work produced by the polling lanes; the
//! mention/tweet/hot-profile items are heartbeat payloads that a lane
//! recycles to itself after every cycle.

use serde::{Deserialize, Serialize};

use super::register::RegisterDetails;

/// A reply waiting to be posted, optionally with an attached image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyJob {
    pub tweet_id: String,
    pub text: String,
    #[serde(default)]
    pub send_image: bool,
    #[serde(default)]
    pub random_image: bool,
    #[serde(default)]
    pub image_links: Vec<String>,
    #[serde(default)]
    pub image_link: Option<String>,
}

impl ReplyJob {
    /// A plain text reply with no media.
    pub fn text(tweet_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tweet_id: tweet_id.into(),
            text: text.into(),
            send_image: false,
            random_image: false,
            image_links: Vec::new(),
            image_link: None,
        }
    }
}

/// Heartbeat payload for the mention-scanning lanes (mentions plus every
/// on-chain tool lane).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionJob {
    /// Handle whose mention timeline is scanned.
    pub handle: String,
    /// Prompt used when generating replies from this lane.
    pub prompt: String,
    /// Full registration the lane was seeded from.
    pub details: RegisterDetails,
}

/// Heartbeat payload for the hot-profiles lane; one item per watched profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotProfileJob {
    pub name: String,
    pub handle: String,
    pub description: String,
    pub prompt: String,
}
