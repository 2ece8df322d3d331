//! Key-value cache used for debounce stamps, per-tweet dedup markers,
//! cached user profiles, and active airdrop state.
//!
//! Every capability uses its own key namespace, so concurrent lanes never
//! contend on the same keys; reads and writes carry no transactional
//! guarantee.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Namespace prefix applied to every cache key.
pub fn cache_key(key: &str) -> String {
    format!("PARAKEETBRAIN#{}", key)
}

/// String KV store with optional per-entry expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration);
    async fn delete(&self, key: &str);
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process cache. Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, e| !e.is_expired(now));
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: None,
            },
        );
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) {
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Some(Instant::now() + ttl),
            },
        );
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
