use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::TtlCache;
use crate::config::SwapConfig;
use crate::domain::{AccountSnapshot, Quote};
use crate::ledger::{BalanceSource, LedgerAccess, WalletSigner};
use crate::pipeline::{SwapPipeline, TxState};
use crate::reads::MarketReader;
use crate::Error;

/// Remote collaborators a session needs
#[derive(Clone)]
pub struct Collaborators {
    pub ledger: Arc<dyn LedgerAccess>,
    pub signer: Arc<dyn WalletSigner>,
    pub balances: Arc<dyn BalanceSource>,
}

/// One connected wallet account: its reader, its pipeline and the
/// background refresh keeping the reader warm
pub struct Session {
    account: String,
    reader: Arc<MarketReader>,
    pipeline: SwapPipeline,
    refresh_task: Option<JoinHandle<()>>,
}

impl Session {
    /// Starts a session for `account`. Must be called inside a tokio runtime.
    pub fn connect(
        account: impl Into<String>,
        collaborators: Collaborators,
        cache: Arc<TtlCache>,
        config: SwapConfig,
    ) -> crate::Result<Self> {
        config.validate()?;
        let account = account.into();

        let reader = Arc::new(MarketReader::new(
            Arc::clone(&collaborators.ledger),
            collaborators.balances,
            cache,
            config.clone(),
        ));
        let pipeline = SwapPipeline::new(
            account.clone(),
            collaborators.ledger,
            collaborators.signer,
            Arc::clone(&reader),
            config,
        );
        let refresh_task = Some(reader.spawn_background_refresh(account.clone()));

        info!(%account, "Session connected");
        Ok(Self {
            account,
            reader,
            pipeline,
            refresh_task,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn is_connected(&self) -> bool {
        self.refresh_task.is_some()
    }

    pub fn reader(&self) -> &Arc<MarketReader> {
        &self.reader
    }

    pub fn pipeline(&self) -> &SwapPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut SwapPipeline {
        &mut self.pipeline
    }

    /// Last published account state
    pub fn snapshot(&self) -> Option<AccountSnapshot> {
        self.reader.latest()
    }

    fn stop_tasks(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
        if let Some(task) = self.pipeline.take_settle_task() {
            task.abort();
        }
    }

    fn ensure_connected(&self) -> crate::Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(Error::Wallet("No wallet connected".to_string()))
        }
    }

    /// User-triggered refresh; errors are returned to the caller
    pub async fn refresh(&self, force: bool) -> crate::Result<AccountSnapshot> {
        self.ensure_connected()?;
        self.reader.refresh(&self.account, force).await
    }

    pub async fn quote(&self, xlm_in: f64) -> crate::Result<Quote> {
        self.ensure_connected()?;
        self.reader.quote(&self.account, xlm_in).await
    }

    /// Runs an XLM to token swap. Fails without touching the ledger once disconnected.
    pub async fn swap_xlm(&mut self, amount: f64) -> crate::Result<TxState> {
        self.ensure_connected()?;
        Ok(self.pipeline.swap_xlm(amount).await)
    }

    pub async fn swap_token(&mut self, amount: f64) -> crate::Result<TxState> {
        self.ensure_connected()?;
        Ok(self.pipeline.swap_token(amount).await)
    }

    /// Stops background reads and forgets all in-memory session state
    pub fn disconnect(&mut self) {
        self.stop_tasks();
        self.pipeline.reset();
        self.pipeline.clear_events();
        self.reader.clear_snapshot();
        info!(account = %self.account, "Session disconnected");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_tasks();
    }
}
