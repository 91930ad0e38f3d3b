#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use swap_core::{
    BalanceSource, Collaborators, Error, LedgerAccess, MarketReader, PreparedTx, ScValue,
    SubmitResult, SwapConfig, SwapPipeline, TtlCache, TxStatus, WalletSigner,
};

pub const ACCOUNT: &str = "GUSER";
pub const SWAP_CONTRACT: &str = "CSWAP";
pub const TOKEN_CONTRACT: &str = "CTOKEN";

pub fn config() -> SwapConfig {
    SwapConfig::new(SWAP_CONTRACT, TOKEN_CONTRACT)
}

/// Call recorded by [`MockLedger`]
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub contract: String,
    pub method: String,
    pub args: Vec<ScValue>,
}

/// In-memory ledger with scripted answers
pub struct MockLedger {
    pub hash: Mutex<String>,
    pub pool_units: Mutex<(i128, i128)>,
    pub token_units: Mutex<i128>,
    pub total_swaps: Mutex<i64>,
    pub price_units: Mutex<i128>,
    pub build_error: Mutex<Option<String>>,
    pub submit_error: Mutex<Option<String>>,
    pub read_error: Mutex<Option<String>>,
    pub method_error: Mutex<Option<(String, String)>>,
    pub statuses: Mutex<VecDeque<TxStatus>>,
    pub builds: Mutex<Vec<Call>>,
    pub reads: Mutex<Vec<Call>>,
    pub submits: AtomicU32,
    pub polls: AtomicU32,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            hash: Mutex::new("abc123".to_string()),
            pool_units: Mutex::new((10_000_000_000, 5_000_000_000)),
            token_units: Mutex::new(0),
            total_swaps: Mutex::new(0),
            price_units: Mutex::new(0),
            build_error: Mutex::new(None),
            submit_error: Mutex::new(None),
            read_error: Mutex::new(None),
            method_error: Mutex::new(None),
            statuses: Mutex::new(VecDeque::from(vec![TxStatus::Success])),
            builds: Mutex::new(Vec::new()),
            reads: Mutex::new(Vec::new()),
            submits: AtomicU32::new(0),
            polls: AtomicU32::new(0),
        }
    }
}

impl MockLedger {
    pub fn with_statuses(statuses: Vec<TxStatus>) -> Self {
        let ledger = Self::default();
        *ledger.statuses.lock().unwrap() = statuses.into();
        ledger
    }

    pub fn fail_build(&self, message: &str) {
        *self.build_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_submit(&self, message: &str) {
        *self.submit_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_reads(&self, message: Option<&str>) {
        *self.read_error.lock().unwrap() = message.map(str::to_string);
    }

    /// Fails read calls of `method` only
    pub fn fail_method(&self, method: &str, message: &str) {
        *self.method_error.lock().unwrap() = Some((method.to_string(), message.to_string()));
    }

    /// Number of read calls made for `method`
    pub fn read_count(&self, method: &str) -> usize {
        self.reads.lock().unwrap().iter().filter(|c| c.method == method).count()
    }

    pub fn build_count(&self) -> usize {
        self.builds.lock().unwrap().len()
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn submit_count(&self) -> u32 {
        self.submits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerAccess for MockLedger {
    async fn build_and_simulate(
        &self,
        _account: &str,
        contract_id: &str,
        method: &str,
        args: Vec<ScValue>,
    ) -> swap_core::Result<PreparedTx> {
        self.builds.lock().unwrap().push(Call {
            contract: contract_id.to_string(),
            method: method.to_string(),
            args,
        });
        if let Some(message) = self.build_error.lock().unwrap().clone() {
            return Err(Error::Simulation(message));
        }
        Ok(PreparedTx {
            envelope_xdr: format!("unsigned:{}", method),
        })
    }

    async fn submit(&self, signed_xdr: &str) -> swap_core::Result<SubmitResult> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        assert!(signed_xdr.starts_with("signed:"), "submitted unsigned envelope {}", signed_xdr);
        if let Some(message) = self.submit_error.lock().unwrap().clone() {
            return Err(Error::Contract(message));
        }
        Ok(SubmitResult {
            hash: self.hash.lock().unwrap().clone(),
        })
    }

    async fn poll_status(&self, _hash: &str) -> swap_core::Result<TxStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(TxStatus::NotFound))
    }

    async fn simulate_call(
        &self,
        _account: &str,
        contract_id: &str,
        method: &str,
        args: Vec<ScValue>,
    ) -> swap_core::Result<ScValue> {
        self.reads.lock().unwrap().push(Call {
            contract: contract_id.to_string(),
            method: method.to_string(),
            args,
        });
        if let Some(message) = self.read_error.lock().unwrap().clone() {
            return Err(Error::Network(message));
        }
        if let Some((failing, message)) = self.method_error.lock().unwrap().clone() {
            if failing == method {
                return Err(Error::Network(message));
            }
        }

        match method {
            "get_pool" => {
                let (xlm, token) = *self.pool_units.lock().unwrap();
                let mut fields = BTreeMap::new();
                fields.insert("xlm_reserve".to_string(), ScValue::I128(xlm));
                fields.insert("token_reserve".to_string(), ScValue::I128(token));
                fields.insert("token_contract".to_string(), ScValue::Address(TOKEN_CONTRACT.to_string()));
                Ok(ScValue::Map(fields))
            }
            "balance" => Ok(ScValue::I128(*self.token_units.lock().unwrap())),
            "total_swaps" => Ok(ScValue::I64(*self.total_swaps.lock().unwrap())),
            "get_price" => Ok(ScValue::I128(*self.price_units.lock().unwrap())),
            other => Err(Error::Simulation(format!("unknown method {}", other))),
        }
    }
}

/// Wallet that signs everything unless told to refuse
#[derive(Default)]
pub struct MockSigner {
    pub refusal: Mutex<Option<String>>,
    pub signed: AtomicU32,
}

impl MockSigner {
    pub fn refusing(message: &str) -> Self {
        Self {
            refusal: Mutex::new(Some(message.to_string())),
            signed: AtomicU32::new(0),
        }
    }

    pub fn sign_count(&self) -> u32 {
        self.signed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletSigner for MockSigner {
    async fn sign(&self, envelope_xdr: &str) -> swap_core::Result<String> {
        if let Some(message) = self.refusal.lock().unwrap().clone() {
            return Err(Error::Wallet(message));
        }
        self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(envelope_xdr.replacen("unsigned:", "signed:", 1))
    }
}

/// Native balance lookup with a settable value
pub struct MockBalances {
    pub balance: Mutex<f64>,
    pub calls: AtomicU32,
}

impl MockBalances {
    pub fn new(balance: f64) -> Self {
        Self {
            balance: Mutex::new(balance),
            calls: AtomicU32::new(0),
        }
    }

    pub fn set(&self, balance: f64) {
        *self.balance.lock().unwrap() = balance;
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for MockBalances {
    async fn native_balance(&self, _account: &str) -> swap_core::Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.balance.lock().unwrap())
    }
}

/// Everything a test needs, with handles on the mocks
pub struct Harness {
    pub ledger: Arc<MockLedger>,
    pub signer: Arc<MockSigner>,
    pub balances: Arc<MockBalances>,
    pub cache: Arc<TtlCache>,
    pub reader: Arc<MarketReader>,
}

impl Harness {
    pub fn new(ledger: MockLedger, signer: MockSigner) -> Self {
        let ledger = Arc::new(ledger);
        let signer = Arc::new(signer);
        let balances = Arc::new(MockBalances::new(100.0));
        let cache = TtlCache::shared();
        let reader = Arc::new(MarketReader::new(
            ledger.clone(),
            balances.clone(),
            cache.clone(),
            config(),
        ));
        Self {
            ledger,
            signer,
            balances,
            cache,
            reader,
        }
    }

    pub fn happy() -> Self {
        Self::new(MockLedger::default(), MockSigner::default())
    }

    pub fn pipeline(&self) -> SwapPipeline {
        SwapPipeline::new(
            ACCOUNT,
            self.ledger.clone(),
            self.signer.clone(),
            self.reader.clone(),
            config(),
        )
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            ledger: self.ledger.clone(),
            signer: self.signer.clone(),
            balances: self.balances.clone(),
        }
    }
}
