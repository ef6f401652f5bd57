//! Transfer submission state machine.
//!
//! ```text
//! Idle → Validating ─invalid──────────────────────────────┐
//!            │ valid                                      │
//!            ▼                                            ▼
//!     CheckingConnection ─not connected / wrong chain──▶ Failed
//!            │ ok                                         ▲
//!            ▼                                            │
//!        Submitting ─chain error──────────────────────────┘
//!            │ hash
//!            ▼
//!        Succeeded
//! ```
//!
//! Every path into `Failed` reports through the [`ErrorReporter`] before the
//! error is returned. Submits are never retried here.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use serde_json::Value;

use crate::chain::client::ChainClient;
use crate::chain::types::Network;
use crate::observability::logger::{Context, ErrorInfo, Logger};
use crate::observability::metrics;
use crate::observability::reporter::ErrorReporter;
use crate::pipeline::error::SubmitError;
use crate::validation::TransferRequest;

/// Steps of a single `send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Idle,
    Validating,
    CheckingConnection,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStage::Idle => "idle",
            SubmissionStage::Validating => "validating",
            SubmissionStage::CheckingConnection => "checking_connection",
            SubmissionStage::Submitting => "submitting",
            SubmissionStage::Succeeded => "succeeded",
            SubmissionStage::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
}

/// Result of a successful `send`. Failures are returned as [`SubmitError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub hash: TxHash,
    pub status: SubmissionStatus,
}

/// Read-only view of the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountOverview {
    pub chain_id: u64,
    pub account: Option<Address>,
    /// `None` when disconnected or the balance read failed.
    pub balance: Option<U256>,
    pub is_connected: bool,
}

/// Validates transfers, checks the connection and submits through a
/// [`ChainClient`].
///
/// Concurrent `send` calls are independent; callers that need one
/// submission per account in flight must serialize themselves.
pub struct TransactionSubmitter<C> {
    client: C,
    network: Network,
    logger: Arc<Logger>,
    reporter: Arc<ErrorReporter>,
}

impl<C: ChainClient> TransactionSubmitter<C> {
    pub fn new(
        client: C,
        network: Network,
        logger: Arc<Logger>,
        reporter: Arc<ErrorReporter>,
    ) -> Self {
        Self {
            client,
            network,
            logger,
            reporter,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The network transfers must be sent on.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Submit a value transfer.
    ///
    /// Not idempotent: each call that passes the checks performs its own
    /// submit.
    pub async fn send(&self, request: &TransferRequest) -> Result<SubmissionOutcome, SubmitError> {
        self.enter(SubmissionStage::Idle);

        match self.run(request).await {
            Ok(outcome) => {
                metrics::record_submission("success");
                Ok(outcome)
            }
            Err(err) => {
                self.enter(SubmissionStage::Failed);
                let context = transfer_context(self.client.current_address(), request);
                self.reporter
                    .report(error_info(&err), err.severity(), Some(context));
                metrics::record_submission(err.kind().as_str());
                Err(err)
            }
        }
    }

    async fn run(&self, request: &TransferRequest) -> Result<SubmissionOutcome, SubmitError> {
        self.enter(SubmissionStage::Validating);
        let transfer = request.validate()?;

        self.enter(SubmissionStage::CheckingConnection);
        let from = self.client.current_address().ok_or(SubmitError::NotConnected)?;

        let chain_id = self.client.current_chain_id();
        if chain_id != self.network.id {
            return Err(SubmitError::WrongNetwork {
                expected: self.network.name.clone(),
                actual: chain_id,
            });
        }

        self.enter(SubmissionStage::Submitting);
        let hash = self
            .client
            .submit(transfer.to(), transfer.value(), transfer.data().clone())
            .await?;

        self.enter(SubmissionStage::Succeeded);
        let mut context = transfer_context(Some(from), request);
        context.insert("hash".to_string(), Value::from(hash.to_string()));
        if let Some(url) = self.network.tx_explorer_url(&hash) {
            context.insert("explorer_url".to_string(), Value::from(url));
        }
        self.logger.info("Transaction sent", Some(context));

        Ok(SubmissionOutcome {
            hash,
            status: SubmissionStatus::Success,
        })
    }

    /// Snapshot of chain, account and balance. A failed balance read is
    /// logged and reported as `None`.
    pub async fn overview(&self) -> AccountOverview {
        let account = self.client.current_address();
        let balance = match account {
            Some(_) => match self.client.current_balance().await {
                Ok(balance) => Some(balance),
                Err(e) => {
                    self.logger.warn(
                        "Balance unavailable",
                        Some(context_of([("error", Value::from(e.to_string()))])),
                    );
                    None
                }
            },
            None => None,
        };

        AccountOverview {
            chain_id: self.client.current_chain_id(),
            account,
            balance,
            is_connected: account.is_some(),
        }
    }

    fn enter(&self, stage: SubmissionStage) {
        self.logger.debug(
            "Submission stage",
            Some(context_of([("stage", Value::from(stage.as_str()))])),
        );
    }
}

fn error_info(err: &SubmitError) -> ErrorInfo {
    match err {
        SubmitError::Execution(inner) => ErrorInfo::from_error(inner),
        other => ErrorInfo::from_error(other),
    }
}

fn transfer_context(from: Option<Address>, request: &TransferRequest) -> Context {
    context_of([
        (
            "from",
            from.map(|a| Value::from(a.to_string())).unwrap_or(Value::Null),
        ),
        ("to", Value::from(request.to.clone())),
        ("value", Value::from(request.value.to_string())),
    ])
}

fn context_of<const N: usize>(pairs: [(&str, Value); N]) -> Context {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
