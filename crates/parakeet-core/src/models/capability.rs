use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// One independent automation feature with its own gate/queue/scheduler lane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityId {
    Reply,
    PriorityReply,
    Tweet,
    HotProfiles,
    Mentions,
    TokenCreation,
    TokenDeploy,
    NftCreation,
    TokenSwap,
    TokenLend,
    SolStake,
    TokenAirdrop,
    TokenPrice,
    Github,
}

impl CapabilityId {
    pub const ALL: [CapabilityId; 14] = [
        CapabilityId::Reply,
        CapabilityId::PriorityReply,
        CapabilityId::Tweet,
        CapabilityId::HotProfiles,
        CapabilityId::Mentions,
        CapabilityId::TokenCreation,
        CapabilityId::TokenDeploy,
        CapabilityId::NftCreation,
        CapabilityId::TokenSwap,
        CapabilityId::TokenLend,
        CapabilityId::SolStake,
        CapabilityId::TokenAirdrop,
        CapabilityId::TokenPrice,
        CapabilityId::Github,
    ];

    /// Namespace prefix for this capability's per-tweet dedup cache keys.
    pub fn dedup_prefix(&self) -> &'static str {
        match self {
            CapabilityId::TokenCreation => "tokentwtidused",
            CapabilityId::TokenDeploy => "tokendeploytwtidused",
            CapabilityId::NftCreation => "nftcreationtwtidused",
            CapabilityId::TokenSwap => "tokenswaptwtidused",
            CapabilityId::TokenLend => "tokenlendtwtidused",
            CapabilityId::SolStake => "solstaketwtidused",
            CapabilityId::TokenAirdrop => "tokenairdroptwtidused",
            CapabilityId::TokenPrice => "tokenpricetwtidused",
            CapabilityId::Github => "githubtwtidused",
            _ => "twtidused",
        }
    }

    /// Namespace key for this capability's last-checked debounce stamp.
    pub fn debounce_key(&self) -> &'static str {
        match self {
            CapabilityId::Tweet => "lasttweettime",
            CapabilityId::Mentions => "lastmentionedcheck",
            CapabilityId::TokenCreation => "lasttokenmentionedcheck",
            CapabilityId::TokenDeploy => "lasttokendeploymentionedcheck",
            CapabilityId::NftCreation => "lastnftcreationmentionedcheck",
            CapabilityId::TokenSwap => "lasttokenswapmentionedcheck",
            CapabilityId::TokenLend => "lasttokenlendmentionedcheck",
            CapabilityId::SolStake => "lastsolstakementionedcheck",
            CapabilityId::TokenAirdrop => "lasttokenairdropmentionedcheck",
            CapabilityId::TokenPrice => "lasttokenpricementionedcheck",
            CapabilityId::Github => "lastgithubmentionedcheck",
            _ => "lastcheck",
        }
    }
}

impl Display for CapabilityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            CapabilityId::Reply => "reply",
            CapabilityId::PriorityReply => "priority_reply",
            CapabilityId::Tweet => "tweet",
            CapabilityId::HotProfiles => "hot_profiles",
            CapabilityId::Mentions => "mentions",
            CapabilityId::TokenCreation => "token_creation",
            CapabilityId::TokenDeploy => "token_deploy",
            CapabilityId::NftCreation => "nft_creation",
            CapabilityId::TokenSwap => "token_swap",
            CapabilityId::TokenLend => "token_lend",
            CapabilityId::SolStake => "sol_stake",
            CapabilityId::TokenAirdrop => "token_airdrop",
            CapabilityId::TokenPrice => "token_price",
            CapabilityId::Github => "github",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for CapabilityId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reply" => Ok(CapabilityId::Reply),
            "priority_reply" => Ok(CapabilityId::PriorityReply),
            "tweet" => Ok(CapabilityId::Tweet),
            "hot_profiles" => Ok(CapabilityId::HotProfiles),
            "mentions" => Ok(CapabilityId::Mentions),
            "token_creation" => Ok(CapabilityId::TokenCreation),
            "token_deploy" => Ok(CapabilityId::TokenDeploy),
            "nft_creation" => Ok(CapabilityId::NftCreation),
            "token_swap" => Ok(CapabilityId::TokenSwap),
            "token_lend" => Ok(CapabilityId::TokenLend),
            "sol_stake" => Ok(CapabilityId::SolStake),
            "token_airdrop" => Ok(CapabilityId::TokenAirdrop),
            "token_price" => Ok(CapabilityId::TokenPrice),
            "github" => Ok(CapabilityId::Github),
            _ => Err(anyhow::anyhow!("Invalid capability id: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips() {
        for id in CapabilityId::ALL {
            let parsed: CapabilityId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn test_dedup_prefixes_are_namespaced() {
        // Tool lanes must not share dedup keys with the mentions lane.
        assert_ne!(
            CapabilityId::TokenSwap.dedup_prefix(),
            CapabilityId::Mentions.dedup_prefix()
        );
        assert_ne!(
            CapabilityId::TokenSwap.dedup_prefix(),
            CapabilityId::TokenLend.dedup_prefix()
        );
    }

    #[test]
    fn test_invalid_capability_rejected() {
        assert!("warp_drive".parse::<CapabilityId>().is_err());
    }
}
