//! Rate windows, reset cadences and other shared constants.

/// Replies permitted per reset window.
pub const REPLY_WINDOW: u32 = 1;
/// Tweets permitted per reset window.
pub const TWEET_WINDOW: u32 = 1;
/// Mention scans permitted per reset window.
pub const MENTIONS_WINDOW: u32 = 1;

pub const ONE_MIN_IN_MS: u64 = 60_000;
pub const ONE_HOUR_IN_MS: u64 = 3_600_000;

/// Priority replies replenish every minute.
pub const PRIORITY_RESET_INTERVAL_MS: u64 = ONE_MIN_IN_MS;
/// Regular replies replenish every two minutes.
pub const REPLY_RESET_INTERVAL_MS: u64 = 120_000;
/// Mention scans replenish every two minutes.
pub const MENTIONS_RESET_INTERVAL_MS: u64 = 120_000;
/// On-chain tool scans replenish every two minutes.
pub const TOOLS_RESET_INTERVAL_MS: u64 = 120_000;
/// Timeline tweets replenish every fifteen minutes.
pub const TWEET_RESET_INTERVAL_MS: u64 = 900_000;
/// Hot-profile sweeps replenish every two and a half minutes.
pub const HOT_PROFILES_RESET_INTERVAL_MS: u64 = 150_000;

/// Handle polled when a registration does not name one.
pub const DEFAULT_HANDLE: &str = "parakeetbot";

/// Cached user profiles are reused for a day before refetching.
pub const USER_PROFILE_TTL_SECS: u64 = 60 * 60 * 24;
