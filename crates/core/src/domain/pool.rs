use serde::{Deserialize, Serialize};
use std::fmt;

use super::amounts::ScaledAmount;
use super::values::ScValue;
use crate::math;

/// Swap direction against the XLM/token pool
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Sell XLM for the pool token (A→B)
    XlmToToken,
    /// Sell the pool token for XLM (B→A)
    TokenToXlm,
}

impl SwapDirection {
    /// Contract method executing this direction
    pub fn method(&self) -> &'static str {
        match self {
            SwapDirection::XlmToToken => "swap_xlm_to_token",
            SwapDirection::TokenToXlm => "swap_token_to_xlm",
        }
    }

    /// Short label for activity feeds
    pub fn label(&self) -> &'static str {
        match self {
            SwapDirection::XlmToToken => "XLM→SST",
            SwapDirection::TokenToXlm => "SST→XLM",
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pool reserves as reported by `get_pool`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolSnapshot {
    /// XLM reserve in whole tokens
    pub xlm_reserve: f64,

    /// Pool token reserve in whole tokens
    pub token_reserve: f64,

    /// Tokens per XLM at the current reserves
    pub rate: f64,

    /// Address of the pool token contract
    pub token_contract: String,
}

impl PoolSnapshot {
    /// Builds a snapshot from raw reserve units
    pub fn from_units(xlm_units: i128, token_units: i128, token_contract: impl Into<String>) -> Self {
        Self {
            xlm_reserve: ScaledAmount::from_units(xlm_units).to_decimal(),
            token_reserve: ScaledAmount::from_units(token_units).to_decimal(),
            rate: math::spot_rate(xlm_units, token_units),
            token_contract: token_contract.into(),
        }
    }

    /// Decodes the `Pool` struct returned by the swap contract
    pub fn from_sc_value(raw: &ScValue) -> crate::Result<Self> {
        let xlm = raw.field("xlm_reserve")?.as_i128()?;
        let token = raw.field("token_reserve")?.as_i128()?;
        let token_contract = raw.field("token_contract")?.as_address()?;
        Ok(Self::from_units(xlm, token, token_contract))
    }
}

/// Live quote for an XLM amount, never cached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub amount_in: f64,
    pub amount_out: f64,

    /// amount_out / amount_in
    pub effective_rate: f64,

    /// Relative shortfall of the effective rate against the pool rate,
    /// `None` when the pool rate was unavailable
    pub price_impact: Option<f64>,
}

impl Quote {
    pub fn new(amount_in: f64, amount_out: f64, spot_rate: Option<f64>) -> Self {
        let effective_rate = if amount_in > 0.0 { amount_out / amount_in } else { 0.0 };
        Self {
            amount_in,
            amount_out,
            effective_rate,
            price_impact: spot_rate.map(|spot| math::price_impact(spot, effective_rate)),
        }
    }
}

/// Everything the front-end shows for one account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSnapshot {
    pub pool: PoolSnapshot,
    pub xlm_balance: f64,
    pub token_balance: f64,
    pub total_swaps: u64,
}
