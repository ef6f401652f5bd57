//! Shared fixtures for pipeline integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, TxHash, U256};

use transfer_pipeline::chain::{ChainClient, ChainError, ChainResult, Network};
use transfer_pipeline::config::schema::{Environment, ErrorReportingConfig, LoggerConfig};
use transfer_pipeline::observability::{
    ErrorReporter, FixedRandom, LogLevel, Logger, MemorySink,
};
use transfer_pipeline::storage::MemoryStore;
use transfer_pipeline::TransactionSubmitter;

pub const RECIPIENT: &str = "0x1234567890abcdef1234567890abcdef12345678";
pub const DSN: &str = "https://reports.example.com/ingest";

/// What the scripted chain does when asked to submit.
#[allow(dead_code)]
pub enum SubmitScript {
    Hash(TxHash),
    Reject(String),
}

/// In-memory chain client with a fixed account, chain and submit result.
pub struct ScriptedChain {
    pub chain_id: u64,
    pub account: Option<Address>,
    pub balance: Option<U256>,
    script: SubmitScript,
    submits: AtomicUsize,
    last_submit: Mutex<Option<(Address, U256, Bytes)>>,
}

#[allow(dead_code)]
impl ScriptedChain {
    pub fn connected(script: SubmitScript) -> Self {
        Self {
            chain_id: Network::BASE_ID,
            account: Some(sender()),
            balance: Some(U256::from(10u64.pow(18))),
            script,
            submits: AtomicUsize::new(0),
            last_submit: Mutex::new(None),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            account: None,
            ..Self::connected(SubmitScript::Hash(tx_hash(1)))
        }
    }

    pub fn on_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn last_submit(&self) -> Option<(Address, U256, Bytes)> {
        self.last_submit.lock().unwrap().clone()
    }
}

impl ChainClient for ScriptedChain {
    fn current_chain_id(&self) -> u64 {
        self.chain_id
    }

    fn current_address(&self) -> Option<Address> {
        self.account
    }

    async fn current_balance(&self) -> ChainResult<U256> {
        self.balance
            .ok_or_else(|| ChainError::Rpc("balance unavailable".to_string()))
    }

    async fn submit(&self, to: Address, value: U256, data: Bytes) -> ChainResult<TxHash> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        *self.last_submit.lock().unwrap() = Some((to, value, data));
        tokio::task::yield_now().await;
        match &self.script {
            SubmitScript::Hash(hash) => Ok(*hash),
            SubmitScript::Reject(reason) => Err(ChainError::Rejected(reason.clone())),
        }
    }
}

pub fn sender() -> Address {
    "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
}

pub fn tx_hash(byte: u8) -> TxHash {
    TxHash::repeat_byte(byte)
}

/// Pipeline wired to capturing sinks.
#[allow(dead_code)]
pub struct Fixture {
    pub submitter: TransactionSubmitter<Arc<ScriptedChain>>,
    pub chain: Arc<ScriptedChain>,
    pub reporter: Arc<ErrorReporter>,
    pub console: Arc<MemorySink>,
    pub reports: Arc<MemorySink>,
    pub store: Arc<MemoryStore>,
}

pub struct FixtureOptions {
    pub min_level: LogLevel,
    pub reporting_enabled: bool,
    pub sample_rate: f64,
    pub draw: f64,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            reporting_enabled: true,
            sample_rate: 1.0,
            draw: 0.5,
        }
    }
}

pub fn fixture(chain: ScriptedChain, options: FixtureOptions) -> Fixture {
    let console = Arc::new(MemorySink::new());
    let logger = Arc::new(Logger::with_sinks(
        LoggerConfig {
            min_level: options.min_level,
            enable_console: true,
            enable_remote: false,
            remote_endpoint: None,
        },
        console.clone(),
        Arc::new(MemorySink::new()),
    ));

    let store = Arc::new(MemoryStore::new());
    let reports = Arc::new(MemorySink::new());
    let reporter = Arc::new(
        ErrorReporter::new(
            ErrorReportingConfig {
                enabled: options.reporting_enabled,
                dsn: Some(DSN.to_string()),
                environment: Environment::Production,
                sample_rate: options.sample_rate,
            },
            logger.clone(),
            store.clone(),
        )
        .with_random(Arc::new(FixedRandom(options.draw)))
        .with_sink(reports.clone()),
    );

    let chain = Arc::new(chain);
    let submitter =
        TransactionSubmitter::new(chain.clone(), Network::base(), logger, reporter.clone());

    Fixture {
        submitter,
        chain,
        reporter,
        console,
        reports,
        store,
    }
}
