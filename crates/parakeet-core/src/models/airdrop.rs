//! Quote-tweet airdrop registrations.
//!
//! An airdrop is registered against a tweet id; quote tweets of it are
//! validated by the mentions lane (model verdict with a follower-count
//! fallback) until the per-airdrop limit is exhausted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Cache key (unnamespaced) holding the map of active airdrops.
pub const ACTIVE_AIRDROPS_KEY: &str = "ACTIVEAIRDROPS";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AirdropRegistration {
    #[validate(length(min = 1))]
    pub tweet_id: String,
    /// Maximum number of quote tweets rewarded.
    #[validate(range(min = 1))]
    pub limit: u32,
    /// Prompt given to the model to judge whether a quote tweet qualifies.
    #[validate(length(min = 1))]
    pub validator_prompt: String,
    /// Fallback: reward anyway when the author has at least this many followers.
    #[serde(default)]
    pub min_followers_count: u64,
}

/// An airdrop in progress: its registration plus how many rewards were sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveAirdrop {
    pub metadata: AirdropRegistration,
    #[serde(default)]
    pub count: u32,
}

impl ActiveAirdrop {
    pub fn new(metadata: AirdropRegistration) -> Self {
        Self { metadata, count: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.metadata.limit
    }
}

/// The cached map is keyed by the registered tweet id.
pub type ActiveAirdrops = HashMap<String, ActiveAirdrop>;
