//! Capability workers.
//!
//! One module per capability; each implements [`parakeet_queue::Worker`]
//! for its lane's item type. The shared scan/debounce/dedup plumbing lives
//! in [`support`], the tweet-body field parsing in [`parse`].

pub mod github_issues;
pub mod hot_profiles;
pub mod mentions;
pub mod nft_creation;
pub mod parse;
pub mod reply;
pub mod sol_stake;
pub mod support;
pub mod token_airdrop;
pub mod token_creation;
pub mod token_deploy;
pub mod token_lend;
pub mod token_price;
pub mod token_swap;
pub mod tweet;

#[cfg(test)]
pub(crate) mod testing;

pub use support::WorkerDeps;
