pub mod airdrop;
pub mod capability;
pub mod register;
pub mod work;

pub use airdrop::{ActiveAirdrop, ActiveAirdrops, AirdropRegistration};
pub use capability::CapabilityId;
pub use register::{
    AgentKitRef, AlexaConfig, BotMetadata, DiscordConfig, GithubConfig, HotProfile, Platforms,
    RegisterDetails, RegisterRequest, SlackConfig, ToolToggles,
};
pub use work::{HotProfileJob, MentionJob, ReplyJob};
