//! Swap transaction pipeline.
//!
//! Drives one swap attempt through build, sign, submit and confirm. Every
//! collaborator failure is caught here, classified, and parked in the
//! `Failed` state; nothing propagates to the caller. `swap` takes `&mut self`,
//! so a pipeline can only ever have one attempt in flight.

pub mod poll;
pub mod state;

pub use poll::{PollOutcome, PollPolicy};
pub use state::TxState;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::SwapConfig;
use crate::domain::{EventLog, ScValue, ScaledAmount, SwapDirection, SwapEvent};
use crate::errors::{classify, ClassifiedError};
use crate::ledger::{LedgerAccess, SubmitResult, TxStatus, WalletSigner};
use crate::reads::MarketReader;
use crate::Error;

/// Per-session swap state machine
pub struct SwapPipeline {
    account: String,
    ledger: Arc<dyn LedgerAccess>,
    signer: Arc<dyn WalletSigner>,
    reader: Arc<MarketReader>,
    config: SwapConfig,
    state: TxState,
    hash: Option<String>,
    error: Option<ClassifiedError>,
    events: EventLog,
    history: Vec<(TxState, TxState)>,
    state_tx: watch::Sender<TxState>,
    settle_task: Option<JoinHandle<()>>,
}

impl SwapPipeline {
    /// Creates an idle pipeline for `account`
    pub fn new(
        account: impl Into<String>,
        ledger: Arc<dyn LedgerAccess>,
        signer: Arc<dyn WalletSigner>,
        reader: Arc<MarketReader>,
        config: SwapConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(TxState::Idle);
        Self {
            account: account.into(),
            ledger,
            signer,
            reader,
            events: EventLog::new(config.max_events),
            config,
            state: TxState::Idle,
            hash: None,
            error: None,
            history: Vec::new(),
            state_tx,
            settle_task: None,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// Hash of the current attempt, known from `Confirm` on
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Why the last attempt failed
    pub fn error(&self) -> Option<&ClassifiedError> {
        self.error.as_ref()
    }

    /// Confirmed swaps, newest first
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Transitions taken by the current attempt
    pub fn history(&self) -> &[(TxState, TxState)] {
        &self.history
    }

    /// Explorer link for the current hash
    pub fn explorer_url(&self) -> Option<String> {
        self.hash.as_deref().map(|hash| self.config.explorer_tx_url(hash))
    }

    /// Watches state changes while an attempt runs
    pub fn subscribe(&self) -> watch::Receiver<TxState> {
        self.state_tx.subscribe()
    }

    /// Hands out the pending post-swap refresh, if any
    pub fn take_settle_task(&mut self) -> Option<JoinHandle<()>> {
        self.settle_task.take()
    }

    /// Returns to `Idle` and forgets the last hash and error
    pub fn reset(&mut self) {
        self.state = TxState::Idle;
        self.hash = None;
        self.error = None;
        self.history.clear();
        self.state_tx.send_replace(TxState::Idle);
    }

    /// Drops the activity log, used when the session ends
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Sells `amount` XLM for the pool token
    pub async fn swap_xlm(&mut self, amount: f64) -> TxState {
        self.swap(SwapDirection::XlmToToken, amount).await
    }

    /// Sells `amount` pool tokens for XLM
    pub async fn swap_token(&mut self, amount: f64) -> TxState {
        self.swap(SwapDirection::TokenToXlm, amount).await
    }

    /// Runs one swap attempt to a terminal state and returns it
    pub async fn swap(&mut self, direction: SwapDirection, amount: f64) -> TxState {
        self.reset();
        info!(account = %self.account, %direction, amount, "Starting swap");

        match self.execute(direction, amount).await {
            Ok(hash) => {
                if let Err(e) = self.advance(TxState::Succeeded) {
                    error!("{}", e);
                }
                self.events.record(SwapEvent::new(direction, amount, hash.clone()));
                let settle = self
                    .reader
                    .schedule_settle_refresh(self.account.clone(), self.config.settle_delay());
                if let Some(previous) = self.settle_task.replace(settle) {
                    previous.abort();
                }
                info!(%hash, %direction, amount, "Swap confirmed");
            }
            Err(err) => {
                let classified = classify(&err);
                warn!(
                    stage = %self.state,
                    kind = %classified.kind,
                    "Swap failed: {}",
                    err
                );
                self.error = Some(classified);
                if let Err(e) = self.advance(TxState::Failed) {
                    error!("{}", e);
                }
            }
        }

        self.state
    }

    async fn execute(&mut self, direction: SwapDirection, amount: f64) -> crate::Result<String> {
        self.advance(TxState::Build)?;
        let units = ScaledAmount::from_decimal(amount)?;
        if !units.is_positive() {
            return Err(Error::InvalidAmount(format!("{} must be greater than zero", amount)));
        }
        let args = vec![ScValue::Address(self.account.clone()), ScValue::I128(units.units())];
        let prepared = self
            .ledger
            .build_and_simulate(&self.account, &self.config.swap_contract, direction.method(), args)
            .await?;

        self.advance(TxState::Sign)?;
        let signed = self.signer.sign(&prepared.envelope_xdr).await?;

        self.advance(TxState::Send)?;
        let SubmitResult { hash } = self.ledger.submit(&signed).await?;
        self.hash = Some(hash.clone());

        self.advance(TxState::Confirm)?;
        self.confirm(&hash).await?;

        Ok(hash)
    }

    async fn confirm(&self, hash: &str) -> crate::Result<()> {
        let ledger = Arc::clone(&self.ledger);
        self.config
            .poll_policy()
            .run(|attempt| {
                let ledger = Arc::clone(&ledger);
                let hash = hash.to_string();
                async move {
                    let status = ledger.poll_status(&hash).await?;
                    debug!(%hash, attempt, ?status, "Polled transaction");
                    match status {
                        TxStatus::Success => Ok(PollOutcome::Ready(())),
                        TxStatus::NotFound => Ok(PollOutcome::Pending),
                        TxStatus::Failed => Err(Error::Contract("Transaction FAILED".to_string())),
                        TxStatus::Other(status) => Err(Error::UnexpectedStatus(status)),
                    }
                }
            })
            .await
    }

    fn advance(&mut self, next: TxState) -> crate::Result<()> {
        let from = self.state;
        self.state = from.transition(next)?;
        self.history.push((from, next));
        self.state_tx.send_replace(next);
        debug!(%from, to = %next, "Pipeline transition");
        Ok(())
    }
}

impl std::fmt::Debug for SwapPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapPipeline")
            .field("account", &self.account)
            .field("state", &self.state)
            .field("hash", &self.hash)
            .field("error", &self.error)
            .field("events", &self.events.len())
            .finish()
    }
}
