//! Remote collaborators the core talks to.
//!
//! The core never does I/O itself; hosts plug implementations of these
//! traits in (see the `swap-adapters` crate for the HTTP ones).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ScValue;

/// Transaction built and simulated, ready for the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedTx {
    /// Base64 XDR envelope with resources and auth applied
    pub envelope_xdr: String,
}

/// Accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub hash: String,
}

/// Status reported when polling a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Not in a closed ledger yet
    NotFound,
    Success,
    Failed,
    /// Anything the protocol adds later
    Other(String),
}

impl TxStatus {
    /// Parses the status string of a `getTransaction` response
    pub fn from_rpc(status: &str) -> Self {
        match status {
            "NOT_FOUND" => TxStatus::NotFound,
            "SUCCESS" => TxStatus::Success,
            "FAILED" => TxStatus::Failed,
            other => TxStatus::Other(other.to_string()),
        }
    }
}

/// Builds, simulates, submits and polls transactions
#[async_trait]
pub trait LedgerAccess: Send + Sync {
    /// Builds an invocation of `method` on `contract_id` for `account` and
    /// runs it through simulation
    async fn build_and_simulate(
        &self,
        account: &str,
        contract_id: &str,
        method: &str,
        args: Vec<ScValue>,
    ) -> crate::Result<PreparedTx>;

    /// Submits a signed envelope
    async fn submit(&self, signed_xdr: &str) -> crate::Result<SubmitResult>;

    /// Looks up a submitted transaction
    async fn poll_status(&self, hash: &str) -> crate::Result<TxStatus>;

    /// Read-only call: simulate and return the decoded result
    async fn simulate_call(
        &self,
        account: &str,
        contract_id: &str,
        method: &str,
        args: Vec<ScValue>,
    ) -> crate::Result<ScValue>;
}

/// Wallet that signs envelopes on the user's behalf
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Returns the signed envelope. Fails when the user declines or no wallet is available.
    async fn sign(&self, envelope_xdr: &str) -> crate::Result<String>;
}

/// Native asset balance lookup
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn native_balance(&self, account: &str) -> crate::Result<f64>;
}
