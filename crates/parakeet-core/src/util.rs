//! Small shared helpers for the workers.

use chrono::Utc;
use rand::Rng;

/// Current wall-clock time in milliseconds since the epoch, as stored in the
/// debounce cache entries.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// True when `timestamp_ms` lies more than `hours` in the past.
pub fn is_older_than_hours(timestamp_ms: i64, hours: f64) -> bool {
    let elapsed_ms = (now_millis() - timestamp_ms) as f64;
    elapsed_ms / 3_600_000.0 > hours
}

/// Pick a random element; `None` on an empty slice.
pub fn random_item<T>(items: &[T]) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let idx = rand::rng().random_range(0..items.len());
    items.get(idx)
}
