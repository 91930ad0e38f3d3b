//! HTTP implementations of the swap core's collaborators.

pub mod codec;
pub mod horizon;
pub mod ledger;
pub mod rpc;
pub mod settings;

pub use codec::EnvelopeCodec;
pub use horizon::{AccountRecord, BalanceLine, HorizonClient};
pub use ledger::RpcLedger;
pub use rpc::{GetTransactionResponse, SendTransactionResponse, SimulateResponse, SimulateResult, SorobanRpc};
pub use settings::Settings;
