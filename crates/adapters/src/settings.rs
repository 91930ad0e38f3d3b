//! Host settings: endpoints plus the core `SwapConfig`.
//!
//! Sources, lowest precedence first: built-in testnet defaults, an optional
//! settings file, then `SWAP_*` environment variables (after `.env` is read).

use anyhow::Context;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use swap_core::SwapConfig;

use crate::codec::EnvelopeCodec;
use crate::horizon::HorizonClient;
use crate::ledger::RpcLedger;
use crate::rpc::SorobanRpc;

pub const DEFAULT_RPC_URL: &str = "https://soroban-testnet.stellar.org";
pub const DEFAULT_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";
pub const DEFAULT_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Environment variable prefix, e.g. `SWAP_RPC_URL`
pub const ENV_PREFIX: &str = "SWAP";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Soroban RPC endpoint
    pub rpc_url: String,

    /// Horizon endpoint
    pub horizon_url: String,

    /// Network passphrase handed to the envelope codec
    pub network_passphrase: String,

    #[serde(flatten)]
    pub swap: SwapConfig,
}

impl Settings {
    /// Loads settings from `.env`, an optional file and the environment
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut builder = Self::defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Self::from_builder(builder)
    }

    /// Builder pre-populated with the testnet endpoints
    pub fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
        Config::builder()
            .set_default("rpc_url", DEFAULT_RPC_URL)?
            .set_default("horizon_url", DEFAULT_HORIZON_URL)?
            .set_default("network_passphrase", DEFAULT_NETWORK_PASSPHRASE)
            .context("setting defaults")
    }

    /// Builds, deserializes and validates
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let settings: Settings = builder
            .build()
            .context("reading settings sources")?
            .try_deserialize()
            .context("deserializing settings")?;

        settings.swap.validate().context("invalid swap settings")?;
        tracing::info!(
            rpc = %settings.rpc_url,
            horizon = %settings.horizon_url,
            swap_contract = %settings.swap.swap_contract,
            "Loaded settings"
        );
        Ok(settings)
    }

    pub fn rpc(&self) -> SorobanRpc {
        SorobanRpc::new(self.rpc_url.as_str())
    }

    pub fn horizon(&self) -> HorizonClient {
        HorizonClient::new(self.horizon_url.as_str())
    }

    pub fn ledger<C: EnvelopeCodec>(&self, codec: C) -> RpcLedger<C> {
        RpcLedger::new(self.rpc(), self.horizon(), codec)
    }
}
