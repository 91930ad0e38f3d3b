//! `LedgerAccess` over Horizon and Soroban RPC.

use async_trait::async_trait;
use swap_core::{Error, LedgerAccess, PreparedTx, ScValue, SubmitResult, TxStatus};
use tracing::{debug, info};

use crate::codec::EnvelopeCodec;
use crate::horizon::HorizonClient;
use crate::rpc::{SimulateResponse, SorobanRpc};

/// Ledger access backed by a Soroban RPC node and a Horizon server
#[derive(Debug)]
pub struct RpcLedger<C> {
    rpc: SorobanRpc,
    horizon: HorizonClient,
    codec: C,
}

impl<C: EnvelopeCodec> RpcLedger<C> {
    pub fn new(rpc: SorobanRpc, horizon: HorizonClient, codec: C) -> Self {
        Self { rpc, horizon, codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Builds the invocation envelope and simulates it
    async fn simulate(
        &self,
        account: &str,
        contract_id: &str,
        method: &str,
        args: &[ScValue],
    ) -> swap_core::Result<(String, SimulateResponse)> {
        let record = self.horizon.account(account).await?;
        let sequence = record.sequence_number()?;
        let envelope = self
            .codec
            .build_invocation(account, sequence, contract_id, method, args)?;

        let simulation = self.rpc.simulate_transaction(&envelope).await?;
        if let Some(err) = &simulation.error {
            debug!(method, error = %err, "Simulation failed");
            return Err(Error::Simulation(err.clone()));
        }

        Ok((envelope, simulation))
    }
}

#[async_trait]
impl<C: EnvelopeCodec> LedgerAccess for RpcLedger<C> {
    async fn build_and_simulate(
        &self,
        account: &str,
        contract_id: &str,
        method: &str,
        args: Vec<ScValue>,
    ) -> swap_core::Result<PreparedTx> {
        let (envelope, simulation) = self.simulate(account, contract_id, method, &args).await?;
        let envelope_xdr = self.codec.assemble(&envelope, &simulation)?;
        Ok(PreparedTx { envelope_xdr })
    }

    async fn submit(&self, signed_xdr: &str) -> swap_core::Result<SubmitResult> {
        let response = self.rpc.send_transaction(signed_xdr).await?;

        if response.status == "ERROR" {
            let detail = response
                .error_result_xdr
                .unwrap_or_else(|| "transaction rejected by the network".to_string());
            return Err(Error::Contract(detail));
        }

        info!(hash = %response.hash, status = %response.status, "Transaction submitted");
        Ok(SubmitResult { hash: response.hash })
    }

    async fn poll_status(&self, hash: &str) -> swap_core::Result<TxStatus> {
        let response = self.rpc.get_transaction(hash).await?;
        debug!(hash, status = %response.status, "Polled transaction");
        Ok(TxStatus::from_rpc(&response.status))
    }

    async fn simulate_call(
        &self,
        account: &str,
        contract_id: &str,
        method: &str,
        args: Vec<ScValue>,
    ) -> swap_core::Result<ScValue> {
        let (_, simulation) = self.simulate(account, contract_id, method, &args).await?;
        let result = simulation
            .results
            .first()
            .ok_or_else(|| Error::Decode(format!("{} returned no result", method)))?;
        self.codec.decode_return(&result.xdr)
    }
}
