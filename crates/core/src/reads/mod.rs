//! Cached read path: pool reserves, balances, swap counter and live quotes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::config::SwapConfig;
use crate::domain::{AccountSnapshot, PoolSnapshot, Quote, ScValue, ScaledAmount};
use crate::ledger::{BalanceSource, LedgerAccess};
use crate::Error;

/// Families of cached reads, each keyed `"<prefix>:<account>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Pool,
    XlmBalance,
    TokenBalance,
    Swaps,
}

impl CacheKind {
    pub const ALL: [CacheKind; 4] = [
        CacheKind::Pool,
        CacheKind::XlmBalance,
        CacheKind::TokenBalance,
        CacheKind::Swaps,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            CacheKind::Pool => "pool",
            CacheKind::XlmBalance => "xlmbal",
            CacheKind::TokenBalance => "tokbal",
            CacheKind::Swaps => "swaps",
        }
    }

    pub fn key(&self, account: &str) -> String {
        format!("{}:{}", self.prefix(), account)
    }
}

/// Reads account and pool state through the shared cache
pub struct MarketReader {
    ledger: Arc<dyn LedgerAccess>,
    balances: Arc<dyn BalanceSource>,
    cache: Arc<TtlCache>,
    config: SwapConfig,
    snapshot_tx: watch::Sender<Option<AccountSnapshot>>,
}

impl MarketReader {
    pub fn new(
        ledger: Arc<dyn LedgerAccess>,
        balances: Arc<dyn BalanceSource>,
        cache: Arc<TtlCache>,
        config: SwapConfig,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(None);
        Self {
            ledger,
            balances,
            cache,
            config,
            snapshot_tx,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    fn ttl(&self, kind: CacheKind) -> Duration {
        match kind {
            CacheKind::Pool => self.config.pool_ttl(),
            CacheKind::XlmBalance | CacheKind::TokenBalance => self.config.balance_ttl(),
            CacheKind::Swaps => self.config.swaps_ttl(),
        }
    }

    async fn cached<T, Fut>(&self, kind: CacheKind, account: &str, fetch: Fut) -> crate::Result<T>
    where
        T: Clone + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<T>>,
    {
        let key = kind.key(account);
        if let Some(hit) = self.cache.get::<T>(&key) {
            debug!(%key, "Cache hit");
            return Ok(hit);
        }

        let value = fetch.await?;
        self.cache.set(key, value.clone(), self.ttl(kind));
        Ok(value)
    }

    /// Pool reserves and rate
    pub async fn pool(&self, account: &str) -> crate::Result<PoolSnapshot> {
        self.cached(CacheKind::Pool, account, async {
            let raw = self
                .ledger
                .simulate_call(account, &self.config.swap_contract, "get_pool", Vec::new())
                .await?;
            PoolSnapshot::from_sc_value(&raw)
        })
        .await
    }

    /// Native XLM balance in whole tokens
    pub async fn xlm_balance(&self, account: &str) -> crate::Result<f64> {
        self.cached(CacheKind::XlmBalance, account, self.balances.native_balance(account))
            .await
    }

    /// Pool token balance in whole tokens
    pub async fn token_balance(&self, account: &str) -> crate::Result<f64> {
        self.cached(CacheKind::TokenBalance, account, async {
            let args = vec![ScValue::Address(account.to_string())];
            let raw = self
                .ledger
                .simulate_call(account, &self.config.token_contract, "balance", args)
                .await?;
            Ok(ScaledAmount::from_units(raw.as_i128()?).to_decimal())
        })
        .await
    }

    /// Swaps executed against the pool so far
    pub async fn total_swaps(&self, account: &str) -> crate::Result<u64> {
        self.cached(CacheKind::Swaps, account, async {
            let raw = self
                .ledger
                .simulate_call(account, &self.config.swap_contract, "total_swaps", Vec::new())
                .await?;
            let count = raw.as_i128()?;
            u64::try_from(count).map_err(|_| Error::Decode(format!("negative swap count {}", count)))
        })
        .await
    }

    /// Live quote for selling `xlm_in` XLM. Never cached.
    ///
    /// Only the `get_price` call is required; the pool rate feeding
    /// `price_impact` is read through the cache when available.
    pub async fn quote(&self, account: &str, xlm_in: f64) -> crate::Result<Quote> {
        let units = ScaledAmount::from_decimal(xlm_in)?;
        if !units.is_positive() {
            return Err(Error::InvalidAmount(format!("{} must be greater than zero", xlm_in)));
        }

        let raw = self
            .ledger
            .simulate_call(
                account,
                &self.config.swap_contract,
                "get_price",
                vec![ScValue::I128(units.units())],
            )
            .await?;
        let amount_out = ScaledAmount::from_units(raw.as_i128()?).to_decimal();
        let spot_rate = match self.pool(account).await {
            Ok(pool) => Some(pool.rate),
            Err(e) => {
                debug!(account, "Quote without price impact: {}", e);
                None
            }
        };

        Ok(Quote::new(units.to_decimal(), amount_out, spot_rate))
    }

    /// Drops every cached read for `account`
    pub fn bust_account(&self, account: &str) {
        for kind in CacheKind::ALL {
            self.cache.del(&kind.key(account));
        }
        debug!(account, "Dropped cached reads");
    }

    /// Reads everything for `account` and publishes the result.
    ///
    /// `force` skips the cache. Errors are returned as-is; the background
    /// loop is the one that decides to swallow them.
    pub async fn refresh(&self, account: &str, force: bool) -> crate::Result<AccountSnapshot> {
        if force {
            self.bust_account(account);
        }

        let (pool, xlm_balance, token_balance, total_swaps) = tokio::try_join!(
            self.pool(account),
            self.xlm_balance(account),
            self.token_balance(account),
            self.total_swaps(account),
        )?;

        let snapshot = AccountSnapshot {
            pool,
            xlm_balance,
            token_balance,
            total_swaps,
        };
        self.snapshot_tx.send_replace(Some(snapshot.clone()));
        debug!(account, force, "Refreshed account state");
        Ok(snapshot)
    }

    /// Last published snapshot
    pub fn latest(&self) -> Option<AccountSnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AccountSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn clear_snapshot(&self) {
        self.snapshot_tx.send_replace(None);
    }

    /// Refreshes `account` now and then every `refresh_interval`.
    ///
    /// Failures are logged and keep the previous snapshot.
    pub fn spawn_background_refresh(self: &Arc<Self>, account: String) -> JoinHandle<()> {
        let reader = Arc::clone(self);
        let period = self.config.refresh_interval();
        info!(%account, period_ms = period.as_millis() as u64, "Starting background refresh");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = reader.refresh(&account, false).await {
                    debug!(%account, "Background refresh failed: {}", e);
                }
            }
        })
    }

    /// One-shot forced refresh after `delay`, giving the ledger time to settle
    pub fn schedule_settle_refresh(self: &Arc<Self>, account: String, delay: Duration) -> JoinHandle<()> {
        let reader = Arc::clone(self);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = reader.refresh(&account, true).await {
                warn!(%account, "Post-swap refresh failed: {}", e);
            }
        })
    }
}
