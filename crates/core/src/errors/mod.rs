//! Maps raw failure text to a closed set of user-facing error kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User-facing error category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No wallet installed or the account is unknown
    Wallet,
    /// The user declined or cancelled in the wallet
    Rejected,
    /// Not enough funds on the account
    Balance,
    /// The pool cannot fill the swap
    Liquidity,
    /// Simulation or contract execution failed
    Contract,
    /// Anything else, usually transport trouble
    Network,
}

impl ErrorKind {
    /// Fixed wording for the kinds that never echo the raw message
    fn template(&self) -> Option<&'static str> {
        match self {
            ErrorKind::Wallet => Some("Wallet not found. Please install a Stellar wallet."),
            ErrorKind::Rejected => Some("Transaction rejected by user."),
            ErrorKind::Liquidity => Some("Insufficient pool liquidity for this swap."),
            ErrorKind::Balance => Some("Insufficient balance or account underfunded."),
            ErrorKind::Contract | ErrorKind::Network => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Wallet => "WALLET",
            ErrorKind::Rejected => "REJECTED",
            ErrorKind::Balance => "BALANCE",
            ErrorKind::Liquidity => "LIQUIDITY",
            ErrorKind::Contract => "CONTRACT",
            ErrorKind::Network => "NETWORK",
        };
        f.write_str(name)
    }
}

/// Error kind plus the message shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Checked top to bottom. "insufficient liquidity" has to come before the
// bare "insufficient" pattern.
const RULES: &[(ErrorKind, &[&str])] = &[
    (ErrorKind::Wallet, &["not found", "no wallet"]),
    (ErrorKind::Rejected, &["reject", "declined", "cancel"]),
    (ErrorKind::Liquidity, &["insufficient liquidity"]),
    (ErrorKind::Balance, &["insufficient", "underfunded"]),
    (ErrorKind::Contract, &["contract", "simulation"]),
];

/// Classifies a failure by its text.
///
/// Accepts anything printable, so `"User declined"` and an error whose
/// message is `"User declined"` classify the same way.
pub fn classify(raw: impl fmt::Display) -> ClassifiedError {
    let raw = raw.to_string();
    let lower = raw.to_lowercase();

    let kind = RULES
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ErrorKind::Network);

    let message = match (kind, kind.template()) {
        (_, Some(template)) => template.to_string(),
        (ErrorKind::Contract, None) => format!("Contract error: {}", raw),
        (_, None) => format!("Network error: {}", raw),
    };

    ClassifiedError { kind, message }
}
