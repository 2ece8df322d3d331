//! Parakeet Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! constants shared across all Parakeet components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AirdropRegistration, CapabilityId, GithubConfig, HotProfileJob, MentionJob, RegisterDetails,
    RegisterRequest, ReplyJob,
};
