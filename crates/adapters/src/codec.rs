use swap_core::ScValue;

use crate::rpc::SimulateResponse;

/// XDR envelope work supplied by the host.
///
/// Building and decoding Stellar envelopes needs the network's XDR
/// definitions and the network passphrase; implementations carry both.
/// Every envelope crosses this boundary as base64 text.
pub trait EnvelopeCodec: Send + Sync {
    /// Builds an unsigned `invokeHostFunction` envelope calling `method` on
    /// `contract_id`, sourced from `source` at its current `sequence`
    fn build_invocation(
        &self,
        source: &str,
        sequence: i64,
        contract_id: &str,
        method: &str,
        args: &[ScValue],
    ) -> swap_core::Result<String>;

    /// Applies the resource footprint, fee and auth from a successful simulation
    fn assemble(&self, envelope_xdr: &str, simulation: &SimulateResponse) -> swap_core::Result<String>;

    /// Decodes a simulated return value
    fn decode_return(&self, result_xdr: &str) -> swap_core::Result<ScValue>;
}
