//! Blockchain agent kit boundary.
//!
//! The on-chain tool lanes never touch a chain directly; they call the
//! agent-kit service with a wallet context and get back signatures, mint
//! addresses, or prices. Extra kits can be registered at runtime and are
//! selected by their tweet catch phrase.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parakeet_core::config::AgentKitConfig;
use parakeet_core::models::AgentKitRef;

#[derive(Debug, Clone, Serialize)]
pub struct NftCreator {
    pub address: String,
    pub percentage: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct NftCollectionSpec {
    pub name: String,
    pub uri: String,
    pub royalty_basis_points: u16,
    pub creators: Vec<NftCreator>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirdropReceipt {
    pub signature: String,
    /// Estimated cost in lamports for the whole airdrop.
    #[serde(default)]
    pub cost_estimate: u64,
}

#[async_trait]
pub trait AgentKit: Send + Sync {
    /// Deploy an SPL token; returns the mint address.
    async fn deploy_token(
        &self,
        name: &str,
        uri: &str,
        symbol: &str,
        decimals: u8,
        initial_supply: u64,
    ) -> Result<String>;

    /// Deploy an NFT collection; returns the collection address.
    async fn create_nft_collection(&self, spec: &NftCollectionSpec) -> Result<String>;

    /// Swap `amount` of the source token into the target token; returns the
    /// transaction signature.
    async fn trade(
        &self,
        target_mint: &str,
        amount: f64,
        source_mint: &str,
        slippage_bps: f64,
    ) -> Result<String>;

    /// Lend the given amount; returns the transaction signature.
    async fn lend(&self, amount: f64) -> Result<String>;

    /// Stake SOL; returns the transaction signature.
    async fn stake(&self, amount: f64) -> Result<String>;

    /// Compressed airdrop of `amount_per_recipient` to every recipient.
    async fn airdrop(
        &self,
        mint: &str,
        amount_per_recipient: u64,
        recipients: &[String],
    ) -> Result<AirdropReceipt>;

    /// Current price of a token, as a display string.
    async fn fetch_price(&self, mint: &str) -> Result<String>;
}

// Request/response shapes for the agent-kit service

#[derive(Debug, Serialize)]
struct WalletContext<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    rpc_endpoint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct MintResponse {
    mint: String,
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    collection: String,
}

#[derive(Debug, Deserialize)]
struct SignatureResponse {
    signature: String,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: String,
}

/// HTTP implementation against the agent-kit service.
pub struct HttpAgentKit {
    http: reqwest::Client,
    api_base: String,
    rpc_endpoint: Option<String>,
    private_key: Option<String>,
}

impl HttpAgentKit {
    pub fn new(config: &AgentKitConfig, timeout: Duration) -> Result<Self> {
        Self::with_wallet(
            &config.api_base,
            config.rpc_endpoint.clone(),
            config.private_key.clone(),
            timeout,
        )
    }

    pub fn with_wallet(
        api_base: &str,
        rpc_endpoint: Option<String>,
        private_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the agent kit")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            rpc_endpoint,
            private_key,
        })
    }

    fn wallet(&self) -> WalletContext<'_> {
        WalletContext {
            rpc_endpoint: self.rpc_endpoint.as_deref(),
            private_key: self.private_key.as_deref(),
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        tool: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        self.http
            .post(format!("{}/v1/tools/{}", self.api_base, tool))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Agent kit call '{}' failed", tool))?
            .error_for_status()
            .with_context(|| format!("Agent kit call '{}' rejected", tool))?
            .json()
            .await
            .with_context(|| format!("Failed to decode agent kit '{}' response", tool))
    }
}

#[async_trait]
impl AgentKit for HttpAgentKit {
    async fn deploy_token(
        &self,
        name: &str,
        uri: &str,
        symbol: &str,
        decimals: u8,
        initial_supply: u64,
    ) -> Result<String> {
        let response: MintResponse = self
            .call(
                "deploy-token",
                serde_json::json!({
                    "wallet": self.wallet(),
                    "name": name,
                    "uri": uri,
                    "symbol": symbol,
                    "decimals": decimals,
                    "initial_supply": initial_supply,
                }),
            )
            .await?;
        Ok(response.mint)
    }

    async fn create_nft_collection(&self, spec: &NftCollectionSpec) -> Result<String> {
        let response: CollectionResponse = self
            .call(
                "deploy-collection",
                serde_json::json!({ "wallet": self.wallet(), "collection": spec }),
            )
            .await?;
        Ok(response.collection)
    }

    async fn trade(
        &self,
        target_mint: &str,
        amount: f64,
        source_mint: &str,
        slippage_bps: f64,
    ) -> Result<String> {
        let response: SignatureResponse = self
            .call(
                "trade",
                serde_json::json!({
                    "wallet": self.wallet(),
                    "target_mint": target_mint,
                    "amount": amount,
                    "source_mint": source_mint,
                    "slippage_bps": slippage_bps,
                }),
            )
            .await?;
        Ok(response.signature)
    }

    async fn lend(&self, amount: f64) -> Result<String> {
        let response: SignatureResponse = self
            .call(
                "lend",
                serde_json::json!({ "wallet": self.wallet(), "amount": amount }),
            )
            .await?;
        Ok(response.signature)
    }

    async fn stake(&self, amount: f64) -> Result<String> {
        let response: SignatureResponse = self
            .call(
                "stake",
                serde_json::json!({ "wallet": self.wallet(), "amount": amount }),
            )
            .await?;
        Ok(response.signature)
    }

    async fn airdrop(
        &self,
        mint: &str,
        amount_per_recipient: u64,
        recipients: &[String],
    ) -> Result<AirdropReceipt> {
        self.call(
            "compressed-airdrop",
            serde_json::json!({
                "wallet": self.wallet(),
                "mint": mint,
                "amount_per_recipient": amount_per_recipient,
                "recipients": recipients,
                "priority_fee": 30_000u64,
            }),
        )
        .await
    }

    async fn fetch_price(&self, mint: &str) -> Result<String> {
        let response: PriceResponse = self
            .call(
                "fetch-price",
                serde_json::json!({ "wallet": self.wallet(), "mint": mint }),
            )
            .await?;
        Ok(response.price)
    }
}

struct RegisteredKit {
    catch_phrase: String,
    kit: Arc<dyn AgentKit>,
}

/// Runtime registry of agent kits, keyed by name and routed by catch phrase.
pub struct SvmAgentKits {
    api_base: String,
    timeout: Duration,
    default_kit: Arc<dyn AgentKit>,
    kits: RwLock<HashMap<String, RegisteredKit>>,
}

impl SvmAgentKits {
    pub fn new(default_kit: Arc<dyn AgentKit>, api_base: &str, timeout: Duration) -> Self {
        Self {
            api_base: api_base.to_string(),
            timeout,
            default_kit,
            kits: RwLock::new(HashMap::new()),
        }
    }

    /// Register an extra kit from a registration payload. Errors when the
    /// name is already taken or the wallet env indirection does not resolve.
    pub fn register(&self, reference: &AgentKitRef) -> Result<()> {
        if !reference.enabled {
            return Ok(());
        }
        let mut kits = self.kits.write().expect("agent kit registry poisoned");
        if kits.contains_key(&reference.name) {
            anyhow::bail!("agent kit '{}' already configured", reference.name);
        }
        let rpc = reference
            .resolve_rpc_endpoint()
            .with_context(|| format!("rpc endpoint unresolved for kit '{}'", reference.name))?;
        let key = reference
            .resolve_private_key()
            .with_context(|| format!("private key unresolved for kit '{}'", reference.name))?;
        let kit = HttpAgentKit::with_wallet(&self.api_base, Some(rpc), Some(key), self.timeout)?;
        kits.insert(
            reference.name.clone(),
            RegisteredKit {
                catch_phrase: reference.tweet_catch_phrase.to_lowercase(),
                kit: Arc::new(kit),
            },
        );
        Ok(())
    }

    pub fn default_kit(&self) -> Arc<dyn AgentKit> {
        self.default_kit.clone()
    }

    /// The kit whose catch phrase appears in `text`, or the default kit.
    pub fn for_text(&self, text: &str) -> Arc<dyn AgentKit> {
        let text = text.to_lowercase();
        let kits = self.kits.read().expect("agent kit registry poisoned");
        for registered in kits.values() {
            if !registered.catch_phrase.is_empty() && text.contains(&registered.catch_phrase) {
                return registered.kit.clone();
            }
        }
        self.default_kit.clone()
    }

    pub fn len(&self) -> usize {
        self.kits.read().expect("agent kit registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
