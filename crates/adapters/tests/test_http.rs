use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use swap_adapters::{EnvelopeCodec, HorizonClient, RpcLedger, SimulateResponse, SorobanRpc};
use swap_core::{BalanceSource, Error, LedgerAccess, ScValue, TxStatus};

/// Codec that writes readable envelopes instead of XDR
struct TextCodec;

impl EnvelopeCodec for TextCodec {
    fn build_invocation(
        &self,
        source: &str,
        sequence: i64,
        contract_id: &str,
        method: &str,
        args: &[ScValue],
    ) -> swap_core::Result<String> {
        Ok(format!("{}:{}:{}:{}:{}", source, sequence, contract_id, method, args.len()))
    }

    fn assemble(&self, envelope_xdr: &str, simulation: &SimulateResponse) -> swap_core::Result<String> {
        let data = simulation.transaction_data.clone().unwrap_or_default();
        Ok(format!("assembled({})+{}", envelope_xdr, data))
    }

    fn decode_return(&self, result_xdr: &str) -> swap_core::Result<ScValue> {
        result_xdr
            .strip_prefix("i128:")
            .and_then(|n| n.parse().ok())
            .map(ScValue::I128)
            .ok_or_else(|| Error::Decode(result_xdr.to_string()))
    }
}

fn rpc_result(result: serde_json::Value) -> String {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
}

async fn mock_account(server: &mut ServerGuard, id: &str) -> mockito::Mock {
    server
        .mock("GET", format!("/accounts/{}", id).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": id,
                "sequence": "4113",
                "balances": [{ "asset_type": "native", "balance": "100.0000000" }]
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_rpc(server: &mut ServerGuard, method: &str, body: String) -> mockito::Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "jsonrpc": "2.0", "method": method })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn ledger(horizon: &ServerGuard, rpc: &ServerGuard) -> RpcLedger<TextCodec> {
    RpcLedger::new(SorobanRpc::new(rpc.url()), HorizonClient::new(horizon.url()), TextCodec)
}

#[tokio::test]
async fn test_horizon_native_balance() {
    let mut server = Server::new_async().await;
    let mock = mock_account(&mut server, "GUSER").await;

    let client = HorizonClient::new(server.url());
    let balance = client.native_balance("GUSER").await.unwrap();

    assert_eq!(balance, 100.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_balance_of_unknown_account_is_network_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/accounts/GNOPE")
        .with_status(404)
        .create_async()
        .await;

    let err = HorizonClient::new(server.url()).native_balance("GNOPE").await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(err.to_string().starts_with("Network error: fetching account GNOPE"));
    assert_eq!(swap_core::classify(&err).kind, swap_core::ErrorKind::Network);
}

#[tokio::test]
async fn test_build_for_unknown_account_is_wallet_error() {
    let mut horizon = Server::new_async().await;
    let rpc = Server::new_async().await;
    horizon
        .mock("GET", "/accounts/GNOPE")
        .with_status(404)
        .create_async()
        .await;

    let err = ledger(&horizon, &rpc)
        .build_and_simulate("GNOPE", "CSWAP", "swap_xlm_to_token", vec![])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AccountNotFound(ref id) if id == "GNOPE"));
    assert_eq!(swap_core::classify(&err).kind, swap_core::ErrorKind::Wallet);
}

#[tokio::test]
async fn test_horizon_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/accounts/GUSER")
        .with_status(503)
        .create_async()
        .await;

    let err = HorizonClient::new(server.url()).native_balance("GUSER").await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(err.to_string().starts_with("Network error: fetching account"));
}

#[tokio::test]
async fn test_rpc_error_object() {
    let mut server = Server::new_async().await;
    mock_rpc(
        &mut server,
        "getTransaction",
        json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32602, "message": "invalid hash" } }).to_string(),
    )
    .await;

    let err = SorobanRpc::new(server.url()).get_transaction("zz").await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(err.to_string().contains("invalid hash"));
}

#[tokio::test]
async fn test_build_and_simulate_assembles() {
    let mut horizon = Server::new_async().await;
    let mut rpc = Server::new_async().await;
    mock_account(&mut horizon, "GUSER").await;
    let sim = mock_rpc(
        &mut rpc,
        "simulateTransaction",
        rpc_result(json!({
            "transactionData": "DATA",
            "minResourceFee": "100",
            "results": [{ "xdr": "AAAA", "auth": [] }],
            "latestLedger": 10
        })),
    )
    .await;

    let prepared = ledger(&horizon, &rpc)
        .build_and_simulate(
            "GUSER",
            "CSWAP",
            "swap_xlm_to_token",
            vec![ScValue::Address("GUSER".into()), ScValue::I128(100_000_000)],
        )
        .await
        .unwrap();

    assert_eq!(prepared.envelope_xdr, "assembled(GUSER:4113:CSWAP:swap_xlm_to_token:2)+DATA");
    sim.assert_async().await;
}

#[tokio::test]
async fn test_simulation_error_is_reported() {
    let mut horizon = Server::new_async().await;
    let mut rpc = Server::new_async().await;
    mock_account(&mut horizon, "GUSER").await;
    mock_rpc(
        &mut rpc,
        "simulateTransaction",
        rpc_result(json!({ "error": "HostError: insufficient liquidity", "latestLedger": 10 })),
    )
    .await;

    let err = ledger(&horizon, &rpc)
        .build_and_simulate("GUSER", "CSWAP", "swap_xlm_to_token", vec![])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Simulation(_)));
    assert_eq!(swap_core::classify(&err).kind, swap_core::ErrorKind::Liquidity);
}

#[tokio::test]
async fn test_simulate_call_decodes_result() {
    let mut horizon = Server::new_async().await;
    let mut rpc = Server::new_async().await;
    mock_account(&mut horizon, "GUSER").await;
    mock_rpc(
        &mut rpc,
        "simulateTransaction",
        rpc_result(json!({ "results": [{ "xdr": "i128:45000000" }], "latestLedger": 10 })),
    )
    .await;

    let value = ledger(&horizon, &rpc)
        .simulate_call("GUSER", "CSWAP", "get_price", vec![ScValue::I128(100_000_000)])
        .await
        .unwrap();

    assert_eq!(value, ScValue::I128(45_000_000));
}

#[tokio::test]
async fn test_simulate_call_without_result() {
    let mut horizon = Server::new_async().await;
    let mut rpc = Server::new_async().await;
    mock_account(&mut horizon, "GUSER").await;
    mock_rpc(&mut rpc, "simulateTransaction", rpc_result(json!({ "latestLedger": 10 }))).await;

    let err = ledger(&horizon, &rpc)
        .simulate_call("GUSER", "CSWAP", "get_pool", vec![])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn test_submit_pending() {
    let horizon = Server::new_async().await;
    let mut rpc = Server::new_async().await;
    mock_rpc(
        &mut rpc,
        "sendTransaction",
        rpc_result(json!({ "status": "PENDING", "hash": "abc123", "latestLedger": 10 })),
    )
    .await;

    let submitted = ledger(&horizon, &rpc).submit("signed").await.unwrap();

    assert_eq!(submitted.hash, "abc123");
}

#[tokio::test]
async fn test_submit_error_status() {
    let horizon = Server::new_async().await;
    let mut rpc = Server::new_async().await;
    mock_rpc(
        &mut rpc,
        "sendTransaction",
        rpc_result(json!({
            "status": "ERROR",
            "hash": "abc123",
            "errorResultXdr": "AAAAAAAAAGT////7AAAAAA==",
            "latestLedger": 10
        })),
    )
    .await;

    let err = ledger(&horizon, &rpc).submit("signed").await.unwrap_err();

    assert_eq!(err.to_string(), "Contract error: AAAAAAAAAGT////7AAAAAA==");
}

#[tokio::test]
async fn test_poll_status() {
    let horizon = Server::new_async().await;
    let mut rpc = Server::new_async().await;
    let poll = rpc
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "getTransaction",
            "params": { "hash": "abc123" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({ "status": "NOT_FOUND", "latestLedger": 10 })))
        .create_async()
        .await;

    let status = ledger(&horizon, &rpc).poll_status("abc123").await.unwrap();

    assert_eq!(status, TxStatus::NotFound);
    poll.assert_async().await;
}
