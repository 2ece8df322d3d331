//! Mock service implementations shared by the worker tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use parakeet_core::config::{AgentKitConfig, LaunchpadConfig};
use parakeet_infra::{Cache, MemoryCache};
use parakeet_queue::SerialQueue;
use parakeet_services::{
    AgentKit, AirdropReceipt, Completion, ContextMessage, GithubClient, LanguageModel,
    LaunchpadClient, NftCollectionSpec, PublicMetrics, SocialPlatform, SvmAgentKits,
    ToolInvocation, ToolSpec, Tweet, UserProfile,
};

use super::support::{ProfileDirectory, WorkerDeps};

pub(crate) fn tweet(id: &str, text: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        text: text.to_string(),
        author_id: Some(format!("author-{}", id)),
        referenced_tweets: Vec::new(),
        media_keys: Vec::new(),
    }
}

#[derive(Default)]
pub(crate) struct MockSocial {
    mentions: Mutex<Vec<Tweet>>,
    timeline: Mutex<Vec<Tweet>>,
    pub posted_tweets: Mutex<Vec<String>>,
    /// (text, in_reply_to, media_ids)
    pub posted_replies: Mutex<Vec<(String, String, Vec<String>)>>,
    username_lookups: AtomicUsize,
    pub fail_posts: AtomicBool,
    pub followers_count: AtomicUsize,
}

impl MockSocial {
    pub(crate) fn push_mention(&self, tweet: Tweet) {
        self.mentions.lock().unwrap().push(tweet);
    }

    pub(crate) fn push_timeline(&self, tweet: Tweet) {
        self.timeline.lock().unwrap().push(tweet);
    }

    pub(crate) fn username_lookups(&self) -> usize {
        self.username_lookups.load(Ordering::SeqCst)
    }

    fn profile(&self, id: String, username: String) -> UserProfile {
        UserProfile {
            id,
            username,
            public_metrics: Some(PublicMetrics {
                followers_count: self.followers_count.load(Ordering::SeqCst) as u64,
            }),
        }
    }
}

#[async_trait]
impl SocialPlatform for MockSocial {
    async fn user_by_username(&self, username: &str) -> Result<UserProfile> {
        self.username_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.profile(format!("uid-{}", username), username.to_string()))
    }

    async fn user_by_id(&self, user_id: &str) -> Result<UserProfile> {
        Ok(self.profile(user_id.to_string(), format!("user{}", user_id)))
    }

    async fn mention_timeline(&self, _user_id: &str) -> Result<Vec<Tweet>> {
        Ok(self.mentions.lock().unwrap().clone())
    }

    async fn user_timeline(&self, _user_id: &str, max_results: u32) -> Result<Vec<Tweet>> {
        let timeline = self.timeline.lock().unwrap();
        Ok(timeline.iter().take(max_results as usize).cloned().collect())
    }

    async fn post_tweet(&self, text: &str) -> Result<String> {
        if self.fail_posts.load(Ordering::SeqCst) {
            anyhow::bail!("post rejected");
        }
        self.posted_tweets.lock().unwrap().push(text.to_string());
        Ok("posted".to_string())
    }

    async fn post_reply(
        &self,
        text: &str,
        in_reply_to: &str,
        media_ids: &[String],
    ) -> Result<String> {
        if self.fail_posts.load(Ordering::SeqCst) {
            anyhow::bail!("reply rejected");
        }
        self.posted_replies.lock().unwrap().push((
            text.to_string(),
            in_reply_to.to_string(),
            media_ids.to_vec(),
        ));
        Ok("replied".to_string())
    }

    async fn upload_media(&self, _bytes: Vec<u8>, _mime_type: &str) -> Result<String> {
        Ok("media-1".to_string())
    }

    async fn fetch_image(&self, _url: &str) -> Result<(Vec<u8>, String)> {
        Ok((vec![1, 2, 3], "image/png".to_string()))
    }
}

pub(crate) struct MockLlm {
    pub response: Mutex<String>,
    pub tool_calls: Mutex<Vec<ToolInvocation>>,
    pub prompts: Mutex<Vec<String>>,
}

impl Default for MockLlm {
    fn default() -> Self {
        Self {
            response: Mutex::new("mock reply".to_string()),
            tool_calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LanguageModel for MockLlm {
    async fn complete(&self, prompt: &str, _context: &[ContextMessage]) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.lock().unwrap().clone())
    }

    async fn complete_with_tools(
        &self,
        prompt: &str,
        _context: &[ContextMessage],
        _tools: &[ToolSpec],
    ) -> Result<Completion> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(Completion {
            content: Some(self.response.lock().unwrap().clone()),
            tool_calls: self.tool_calls.lock().unwrap().clone(),
        })
    }
}

#[derive(Default)]
pub(crate) struct MockKit {
    pub trades: Mutex<Vec<(String, f64, String, f64)>>,
    pub stakes: Mutex<Vec<f64>>,
    pub lends: Mutex<Vec<f64>>,
    pub deploys: Mutex<Vec<String>>,
    pub airdrops: Mutex<Vec<(String, u64, usize)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl AgentKit for MockKit {
    async fn deploy_token(
        &self,
        name: &str,
        _uri: &str,
        _symbol: &str,
        _decimals: u8,
        _initial_supply: u64,
    ) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("deploy failed");
        }
        self.deploys.lock().unwrap().push(name.to_string());
        Ok("mint-addr".to_string())
    }

    async fn create_nft_collection(&self, _spec: &NftCollectionSpec) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("collection failed");
        }
        Ok("collection-addr".to_string())
    }

    async fn trade(
        &self,
        target_mint: &str,
        amount: f64,
        source_mint: &str,
        slippage_bps: f64,
    ) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("trade failed");
        }
        self.trades.lock().unwrap().push((
            target_mint.to_string(),
            amount,
            source_mint.to_string(),
            slippage_bps,
        ));
        Ok("trade-sig".to_string())
    }

    async fn lend(&self, amount: f64) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("lend failed");
        }
        self.lends.lock().unwrap().push(amount);
        Ok("lend-sig".to_string())
    }

    async fn stake(&self, amount: f64) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("stake failed");
        }
        self.stakes.lock().unwrap().push(amount);
        Ok("stake-sig".to_string())
    }

    async fn airdrop(
        &self,
        mint: &str,
        amount_per_recipient: u64,
        recipients: &[String],
    ) -> Result<AirdropReceipt> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("airdrop failed");
        }
        self.airdrops.lock().unwrap().push((
            mint.to_string(),
            amount_per_recipient,
            recipients.len(),
        ));
        Ok(AirdropReceipt {
            signature: "airdrop-sig".to_string(),
            cost_estimate: 4242,
        })
    }

    async fn fetch_price(&self, _mint: &str) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("price failed");
        }
        Ok("1.23".to_string())
    }
}

/// Worker deps over in-memory mocks, with the mocks kept reachable for
/// assertions.
pub(crate) struct TestRig {
    pub deps: Arc<WorkerDeps>,
    pub social: Arc<MockSocial>,
    pub llm: Arc<MockLlm>,
    pub kit: Arc<MockKit>,
}

pub(crate) fn rig(social: MockSocial) -> TestRig {
    rig_with(social, MockLlm::default(), MockKit::default())
}

pub(crate) fn rig_with(social: MockSocial, llm: MockLlm, kit: MockKit) -> TestRig {
    let social = Arc::new(social);
    let llm = Arc::new(llm);
    let kit = Arc::new(kit);
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    let timeout = Duration::from_secs(5);

    let agentkit_config = AgentKitConfig {
        api_base: "http://127.0.0.1:7010".to_string(),
        rpc_endpoint: None,
        private_key: None,
    };
    let launchpad_config = LaunchpadConfig {
        api_base: "http://127.0.0.1:7020".to_string(),
        api_key: None,
        metadata_endpoint: "http://127.0.0.1:7020/api/ipfs".to_string(),
    };

    let deps = Arc::new(WorkerDeps {
        cache: cache.clone(),
        social: social.clone(),
        llm: llm.clone(),
        profiles: ProfileDirectory::new(
            social.clone(),
            cache.clone(),
            Duration::from_secs(86_400),
        ),
        agent_kits: Arc::new(SvmAgentKits::new(
            kit.clone(),
            &agentkit_config.api_base,
            timeout,
        )),
        launchpad: Arc::new(LaunchpadClient::new(&launchpad_config, timeout).unwrap()),
        github: Arc::new(GithubClient::new(timeout).unwrap()),
        reply_queue: SerialQueue::new(),
        priority_queue: SerialQueue::new(),
    });
    TestRig {
        deps,
        social,
        llm,
        kit,
    }
}
