//! Horizon REST client: account records and native balances.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use swap_core::{BalanceSource, Error};
use tracing::debug;

/// Horizon HTTP client
#[derive(Debug, Clone)]
pub struct HorizonClient {
    base_url: String,
    client: reqwest::Client,
}

/// Subset of `GET /accounts/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub sequence: String,
    #[serde(default)]
    pub balances: Vec<BalanceLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceLine {
    pub asset_type: String,
    pub balance: String,
    #[serde(default)]
    pub asset_code: Option<String>,
}

impl AccountRecord {
    /// XLM balance; accounts without a native line read as 0
    pub fn native_balance(&self) -> swap_core::Result<f64> {
        match self.balances.iter().find(|b| b.asset_type == "native") {
            Some(line) => line
                .balance
                .parse::<f64>()
                .map_err(|e| Error::Network(format!("bad balance {:?}: {}", line.balance, e))),
            None => Ok(0.0),
        }
    }

    pub fn sequence_number(&self) -> swap_core::Result<i64> {
        self.sequence
            .parse::<i64>()
            .map_err(|e| Error::Network(format!("bad sequence {:?}: {}", self.sequence, e)))
    }
}

impl HorizonClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Fetches an account. An unknown account is `Error::AccountNotFound`.
    pub async fn account(&self, id: &str) -> swap_core::Result<AccountRecord> {
        let url = format!("{}/accounts/{}", self.base_url, id);
        debug!(%url, "Fetching account");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(Error::AccountNotFound(id.to_string())),
            status if !status.is_success() => {
                return Err(Error::Network(format!("fetching account {} returned {}", id, status)));
            }
            _ => {}
        }

        response
            .json::<AccountRecord>()
            .await
            .map_err(|e| Error::Network(format!("decoding account {}: {}", id, e)))
    }
}

#[async_trait]
impl BalanceSource for HorizonClient {
    /// Any non-2xx, 404 included, is a network error on this path
    async fn native_balance(&self, account: &str) -> swap_core::Result<f64> {
        match self.account(account).await {
            Ok(record) => record.native_balance(),
            Err(Error::AccountNotFound(_)) => Err(Error::Network(format!(
                "fetching account {} returned {}",
                account,
                StatusCode::NOT_FOUND.as_u16()
            ))),
            Err(e) => Err(e),
        }
    }
}
