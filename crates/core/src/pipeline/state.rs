use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Swap transaction lifecycle.
///
/// `Idle -> Build -> Sign -> Send -> Confirm -> Succeeded`, with `Failed`
/// reachable from every in-flight state. Any state may go back to `Idle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TxState {
    #[default]
    Idle,
    Build,
    Sign,
    Send,
    Confirm,
    Succeeded,
    Failed,
}

impl TxState {
    /// Idle or terminal: a new attempt may start from here
    pub fn is_resting(self) -> bool {
        matches!(self, TxState::Idle | TxState::Succeeded | TxState::Failed)
    }

    pub fn is_in_flight(self) -> bool {
        !self.is_resting()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TxState::Succeeded | TxState::Failed)
    }

    /// Whether `self -> next` is an edge of the lifecycle
    pub fn can_transition_to(self, next: TxState) -> bool {
        match (self, next) {
            (_, TxState::Idle) => true,
            (TxState::Idle, TxState::Build)
            | (TxState::Build, TxState::Sign)
            | (TxState::Sign, TxState::Send)
            | (TxState::Send, TxState::Confirm)
            | (TxState::Confirm, TxState::Succeeded) => true,
            (from, TxState::Failed) => from.is_in_flight(),
            _ => false,
        }
    }

    /// Validated transition
    pub fn transition(self, next: TxState) -> crate::Result<TxState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition { from: self, to: next })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxState::Idle => "IDLE",
            TxState::Build => "BUILD",
            TxState::Sign => "SIGN",
            TxState::Send => "SEND",
            TxState::Confirm => "CONFIRM",
            TxState::Succeeded => "OK",
            TxState::Failed => "FAIL",
        }
    }
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
