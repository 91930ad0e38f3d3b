pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod math;
pub mod pipeline;
pub mod reads;
pub mod session;

pub use cache::TtlCache;
pub use config::SwapConfig;
pub use domain::{AccountSnapshot, EventLog, PoolSnapshot, Quote, ScValue, ScaledAmount, SwapDirection, SwapEvent};
pub use errors::{classify, ClassifiedError, ErrorKind};
pub use ledger::{BalanceSource, LedgerAccess, PreparedTx, SubmitResult, TxStatus, WalletSigner};
pub use pipeline::{PollOutcome, PollPolicy, SwapPipeline, TxState};
pub use reads::{CacheKind, MarketReader};
pub use session::{Collaborators, Session};

/// Core result type for swap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
///
/// Display strings are what the classifier sees, so the prefixes matter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("simulation: {0}")]
    Simulation(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Wallet(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(String),

    #[error("Network error: Transaction confirmation timeout after {attempts} attempts")]
    ConfirmationTimeout { attempts: u32 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: TxState, to: TxState },

    #[error("Unexpected contract value: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
