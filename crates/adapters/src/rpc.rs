//! Soroban JSON-RPC client.
//!
//! Only the three methods the swap flow needs. Envelopes travel as base64
//! XDR strings; this client never looks inside them.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use swap_core::Error;
use tracing::debug;

/// Soroban RPC client
#[derive(Debug)]
pub struct SorobanRpc {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// `simulateTransaction` result
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<SimulateResult>,
    #[serde(default)]
    pub transaction_data: Option<String>,
    #[serde(default)]
    pub min_resource_fee: Option<String>,
    #[serde(default)]
    pub latest_ledger: u64,
}

/// One invocation result inside a simulation
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SimulateResult {
    pub xdr: String,
    #[serde(default)]
    pub auth: Vec<String>,
}

/// `sendTransaction` result
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub status: String,
    pub hash: String,
    #[serde(default)]
    pub error_result_xdr: Option<String>,
    #[serde(default)]
    pub latest_ledger: u64,
}

/// `getTransaction` result
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: String,
    #[serde(default)]
    pub latest_ledger: u64,
    #[serde(default)]
    pub ledger: Option<u64>,
    #[serde(default)]
    pub return_value: Option<String>,
}

impl SorobanRpc {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> swap_core::Result<R> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = request.id, "RPC call");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!("{} returned {}", method, status)));
        }

        let body: RpcResponse<R> = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("decoding {} response: {}", method, e)))?;

        match (body.result, body.error) {
            (_, Some(err)) => Err(Error::Network(format!("{} failed ({}): {}", method, err.code, err.message))),
            (Some(result), None) => Ok(result),
            (None, None) => Err(Error::Network(format!("{} returned neither result nor error", method))),
        }
    }

    pub async fn simulate_transaction(&self, envelope_xdr: &str) -> swap_core::Result<SimulateResponse> {
        self.call("simulateTransaction", json!({ "transaction": envelope_xdr })).await
    }

    pub async fn send_transaction(&self, envelope_xdr: &str) -> swap_core::Result<SendTransactionResponse> {
        self.call("sendTransaction", json!({ "transaction": envelope_xdr })).await
    }

    pub async fn get_transaction(&self, hash: &str) -> swap_core::Result<GetTransactionResponse> {
        self.call("getTransaction", json!({ "hash": hash })).await
    }
}
