//! Parakeet Infrastructure
//!
//! Telemetry initialization and the key-value cache shared by the workers.

pub mod cache;
pub mod telemetry;

pub use cache::{cache_key, Cache, MemoryCache};
