use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::events::DEFAULT_EVENT_CAPACITY;
use crate::pipeline::PollPolicy;

/// Swap client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwapConfig {
    /// Swap (AMM) contract id
    pub swap_contract: String,

    /// Pool token contract id
    pub token_contract: String,

    /// Block explorer base URL, used for transaction links
    pub explorer_url: String,

    /// Pool reserves cache lifetime in milliseconds
    pub pool_ttl_ms: u64,

    /// Balance cache lifetime in milliseconds
    pub balance_ttl_ms: u64,

    /// Swap counter cache lifetime in milliseconds
    pub swaps_ttl_ms: u64,

    /// Delay between confirmation polls in milliseconds
    pub poll_interval_ms: u64,

    /// Confirmation polls before giving up
    pub poll_max_attempts: u32,

    /// Wait after a confirmed swap before re-reading account state
    pub settle_delay_ms: u64,

    /// Background refresh period in milliseconds
    pub refresh_interval_ms: u64,

    /// Swaps kept in the activity log
    pub max_events: usize,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            swap_contract: String::new(),
            token_contract: String::new(),
            explorer_url: "https://stellar.expert/explorer/testnet".to_string(),
            pool_ttl_ms: 10_000,
            balance_ttl_ms: 12_000,
            swaps_ttl_ms: 8_000,
            poll_interval_ms: 1_500,
            poll_max_attempts: 20,
            settle_delay_ms: 2_000,
            refresh_interval_ms: 15_000,
            max_events: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SwapConfig {
    /// Creates a default configuration for the given contract pair
    pub fn new(swap_contract: impl Into<String>, token_contract: impl Into<String>) -> Self {
        Self {
            swap_contract: swap_contract.into(),
            token_contract: token_contract.into(),
            ..Self::default()
        }
    }

    /// Checks the values a session cannot run without
    pub fn validate(&self) -> crate::Result<()> {
        if self.swap_contract.is_empty() {
            return Err(crate::Error::ConfigError("swap_contract is not set".to_string()));
        }
        if self.token_contract.is_empty() {
            return Err(crate::Error::ConfigError("token_contract is not set".to_string()));
        }
        if self.poll_max_attempts == 0 {
            return Err(crate::Error::ConfigError("poll_max_attempts must be at least 1".to_string()));
        }
        if self.max_events == 0 {
            return Err(crate::Error::ConfigError("max_events must be at least 1".to_string()));
        }
        if self.refresh_interval_ms == 0 {
            return Err(crate::Error::ConfigError("refresh_interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn pool_ttl(&self) -> Duration {
        Duration::from_millis(self.pool_ttl_ms)
    }

    pub fn balance_ttl(&self) -> Duration {
        Duration::from_millis(self.balance_ttl_ms)
    }

    pub fn swaps_ttl(&self) -> Duration {
        Duration::from_millis(self.swaps_ttl_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Confirmation polling schedule
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(self.poll_interval_ms), self.poll_max_attempts)
    }

    /// Explorer link for a transaction hash
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), hash)
    }
}
