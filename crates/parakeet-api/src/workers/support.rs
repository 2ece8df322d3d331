//! Shared worker plumbing: service handles, the profile directory, and the
//! debounce/dedup cache conventions every scanning lane follows.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use parakeet_core::models::{CapabilityId, ReplyJob};
use parakeet_core::util::{is_older_than_hours, now_millis};
use parakeet_infra::{cache_key, Cache};
use parakeet_queue::SerialQueue;
use parakeet_services::{
    ContextMessage, GithubClient, LanguageModel, LaunchpadClient, SocialPlatform, SvmAgentKits,
    Tweet, UserProfile,
};

/// Posted when the model returned no content for a reply.
pub const DEFAULT_REPLY_TEXT: &str = "hello world!";

/// Everything a worker may need, bundled once at startup.
pub struct WorkerDeps {
    pub cache: Arc<dyn Cache>,
    pub social: Arc<dyn SocialPlatform>,
    pub llm: Arc<dyn LanguageModel>,
    pub profiles: ProfileDirectory,
    pub agent_kits: Arc<SvmAgentKits>,
    pub launchpad: Arc<LaunchpadClient>,
    pub github: Arc<GithubClient>,
    /// Handle to the reply lane's queue (mentions and hot-profiles push here).
    pub reply_queue: SerialQueue<ReplyJob>,
    /// Handle to the priority-reply lane's queue (tool lanes push here).
    pub priority_queue: SerialQueue<ReplyJob>,
}

/// User profile lookups with a cache in front; profiles are refetched after
/// the TTL or when explicitly invalidated.
pub struct ProfileDirectory {
    social: Arc<dyn SocialPlatform>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl ProfileDirectory {
    pub fn new(social: Arc<dyn SocialPlatform>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { social, cache, ttl }
    }

    pub async fn by_username(&self, username: &str, invalidate: bool) -> Result<UserProfile> {
        let key = cache_key(&format!("twtuser{}", username));
        if !invalidate {
            if let Some(cached) = self.cache.get(&key).await {
                if let Ok(profile) = serde_json::from_str::<UserProfile>(&cached) {
                    return Ok(profile);
                }
            }
        }
        let profile = self
            .social
            .user_by_username(username)
            .await
            .with_context(|| format!("profile lookup failed for @{}", username))?;
        self.store(&key, &profile).await;
        Ok(profile)
    }

    pub async fn by_id(&self, user_id: &str, invalidate: bool) -> Result<UserProfile> {
        let key = cache_key(&format!("twtuserid{}", user_id));
        if !invalidate {
            if let Some(cached) = self.cache.get(&key).await {
                if let Ok(profile) = serde_json::from_str::<UserProfile>(&cached) {
                    return Ok(profile);
                }
            }
        }
        let profile = self
            .social
            .user_by_id(user_id)
            .await
            .with_context(|| format!("profile lookup failed for user id {}", user_id))?;
        self.store(&key, &profile).await;
        Ok(profile)
    }

    async fn store(&self, key: &str, profile: &UserProfile) {
        if let Ok(encoded) = serde_json::to_string(profile) {
            self.cache.set_with_ttl(key, encoded, self.ttl).await;
        }
    }
}

/// True when the capability checked recently enough to skip this cycle.
pub async fn debounced(cache: &Arc<dyn Cache>, capability: CapabilityId, hours: f64) -> bool {
    let key = cache_key(capability.debounce_key());
    if let Some(stamp) = cache.get(&key).await {
        if let Ok(timestamp) = stamp.parse::<i64>() {
            if !is_older_than_hours(timestamp, hours) {
                tracing::info!(
                    lane = %capability,
                    "last checked less than {} hours ago, not checking",
                    hours
                );
                return true;
            }
        }
    }
    false
}

/// Record the debounce stamp for this capability.
pub async fn mark_checked(cache: &Arc<dyn Cache>, capability: CapabilityId) {
    let key = cache_key(capability.debounce_key());
    cache.set(&key, now_millis().to_string()).await;
}

pub async fn tweet_already_used(
    cache: &Arc<dyn Cache>,
    capability: CapabilityId,
    tweet_id: &str,
) -> bool {
    let key = cache_key(&format!("{}{}", capability.dedup_prefix(), tweet_id));
    cache.get(&key).await.is_some()
}

pub async fn mark_tweet_used(
    cache: &Arc<dyn Cache>,
    capability: CapabilityId,
    tweet_id: &str,
    note: &str,
) {
    let key = cache_key(&format!("{}{}", capability.dedup_prefix(), tweet_id));
    cache.set(&key, note.to_string()).await;
}

/// True when the tweet text contains the registered tools catch phrase.
/// An unset phrase never matches, so registrations without one cannot
/// trigger on-chain tools by accident.
pub fn matches_catch_phrase(text: &str, phrase: &str) -> bool {
    !phrase.trim().is_empty() && text.to_lowercase().contains(&phrase.to_lowercase())
}

/// Model context for a tweet: its text, plus the first media attachment.
pub fn tweet_context(tweet: &Tweet) -> Vec<ContextMessage> {
    match tweet.media_keys.first() {
        Some(media) => vec![ContextMessage::with_image(&tweet.text, media)],
        None => vec![ContextMessage::text(&tweet.text)],
    }
}

/// Common front half of every mention-scanning cycle: debounce, resolve the
/// watched profile, fetch the mention timeline, and drop tweets this
/// capability already handled. Returns `None` when debounced.
pub async fn fresh_mentions(
    deps: &WorkerDeps,
    capability: CapabilityId,
    debounce_hours: f64,
    handle: &str,
) -> Result<Option<(UserProfile, Vec<Tweet>)>> {
    if debounced(&deps.cache, capability, debounce_hours).await {
        return Ok(None);
    }
    let profile = deps.profiles.by_username(handle, false).await?;
    let tweets = deps
        .social
        .mention_timeline(&profile.id)
        .await
        .context("mention timeline fetch failed")?;

    let mut fresh = Vec::with_capacity(tweets.len());
    for tweet in tweets {
        if tweet_already_used(&deps.cache, capability, &tweet.id).await {
            tracing::debug!(lane = %capability, tweet_id = %tweet.id, "tweet already handled");
            continue;
        }
        fresh.push(tweet);
    }
    Ok(Some((profile, fresh)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::testing;

    #[tokio::test]
    async fn test_profile_directory_caches_lookups() {
        let rig = testing::rig(testing::MockSocial::default());
        let first = rig.deps.profiles.by_username("someone", false).await.unwrap();
        let second = rig.deps.profiles.by_username("someone", false).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(rig.social.username_lookups(), 1);
    }

    #[tokio::test]
    async fn test_profile_directory_invalidate_refetches() {
        let rig = testing::rig(testing::MockSocial::default());
        rig.deps.profiles.by_username("someone", false).await.unwrap();
        rig.deps.profiles.by_username("someone", true).await.unwrap();
        assert_eq!(rig.social.username_lookups(), 2);
    }

    #[tokio::test]
    async fn test_debounce_round_trip() {
        let rig = testing::rig(testing::MockSocial::default());
        assert!(!debounced(&rig.deps.cache, CapabilityId::Mentions, 0.02).await);
        mark_checked(&rig.deps.cache, CapabilityId::Mentions).await;
        assert!(debounced(&rig.deps.cache, CapabilityId::Mentions, 0.02).await);
        // A different capability has its own stamp.
        assert!(!debounced(&rig.deps.cache, CapabilityId::TokenSwap, 0.02).await);
    }

    #[tokio::test]
    async fn test_dedup_round_trip() {
        let rig = testing::rig(testing::MockSocial::default());
        assert!(!tweet_already_used(&rig.deps.cache, CapabilityId::TokenSwap, "1").await);
        mark_tweet_used(&rig.deps.cache, CapabilityId::TokenSwap, "1", "handled").await;
        assert!(tweet_already_used(&rig.deps.cache, CapabilityId::TokenSwap, "1").await);
        // Same tweet id, different capability namespace.
        assert!(!tweet_already_used(&rig.deps.cache, CapabilityId::TokenLend, "1").await);
    }

    #[tokio::test]
    async fn test_fresh_mentions_filters_used() {
        let social = testing::MockSocial::default();
        social.push_mention(testing::tweet("1", "first"));
        social.push_mention(testing::tweet("2", "second"));
        let rig = testing::rig(social);

        mark_tweet_used(&rig.deps.cache, CapabilityId::Mentions, "1", "done").await;
        let (profile, fresh) =
            fresh_mentions(&rig.deps, CapabilityId::Mentions, 0.02, "someone")
                .await
                .unwrap()
                .unwrap();
        assert_eq!(profile.username, "someone");
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "2");
    }

    #[test]
    fn test_catch_phrase_matching() {
        assert!(matches_catch_phrase(
            "Swap Under The Rule of @craftybot now",
            "under the rule of @craftybot"
        ));
        assert!(!matches_catch_phrase("swap please", "under the rule of @craftybot"));
        assert!(!matches_catch_phrase("anything at all", ""));
    }

    #[tokio::test]
    async fn test_fresh_mentions_debounces() {
        let rig = testing::rig(testing::MockSocial::default());
        mark_checked(&rig.deps.cache, CapabilityId::Mentions).await;
        let result = fresh_mentions(&rig.deps, CapabilityId::Mentions, 0.02, "someone")
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
