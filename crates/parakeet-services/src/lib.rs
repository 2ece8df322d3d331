//! External service clients.
//!
//! Everything the workers talk to lives behind these boundaries: the social
//! platform, the language model, the blockchain agent kit, the token
//! launchpad, the GitHub issue API, and the chat platform notifiers.

pub mod agentkit;
pub mod github;
pub mod launchpad;
pub mod llm;
pub mod notify;
pub mod social;

pub use agentkit::{AgentKit, AirdropReceipt, HttpAgentKit, NftCollectionSpec, SvmAgentKits};
pub use github::{CreatedIssue, GithubClient};
pub use launchpad::{CreateTokenMetadata, LaunchTokenRequest, LaunchpadClient, MetadataUpload};
pub use llm::{Completion, ContextMessage, LanguageModel, OpenAiChat, ToolInvocation, ToolSpec};
pub use notify::{AlexaAdapter, DiscordAdapter, SlackAdapter};
pub use social::{PublicMetrics, SocialPlatform, Tweet, TwitterApi, UserProfile};
