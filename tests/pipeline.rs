//! End-to-end behavior of `TransactionSubmitter::send` against a scripted
//! chain client.

mod common;

use alloy::primitives::{Bytes, I256, U256};
use serde_json::Value;

use common::*;
use transfer_pipeline::chain::units::to_signed_wei;
use transfer_pipeline::observability::{LogLevel, Severity};
use transfer_pipeline::pipeline::{ErrorKind, SubmissionStatus};
use transfer_pipeline::storage::{LocalStore, USER_ID_KEY};
use transfer_pipeline::validation::transaction::{
    INVALID_RECIPIENT, NEGATIVE_VALUE, RECIPIENT_REQUIRED,
};
use transfer_pipeline::{Network, TransferRequest};

fn one_wei() -> I256 {
    I256::ONE
}

fn request() -> TransferRequest {
    TransferRequest::new(RECIPIENT, I256::try_from(1_000_000_000_000_000u64).unwrap())
}

#[tokio::test]
async fn test_send_success_returns_hash_and_logs_once() {
    let hash = tx_hash(0xab);
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(hash)),
        FixtureOptions::default(),
    );

    let outcome = f.submitter.send(&request()).await.unwrap();
    assert_eq!(outcome.hash, hash);
    assert_eq!(outcome.status, SubmissionStatus::Success);
    assert_eq!(f.chain.submit_count(), 1);

    let entries = f.console.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Info);
    assert_eq!(entries[0].message, "Transaction sent");

    let context = entries[0].context.as_ref().unwrap();
    assert_eq!(context["hash"], hash.to_string());
    assert_eq!(context["to"], RECIPIENT);
    assert_eq!(context["from"], sender().to_string());
    assert_eq!(context["value"], "1000000000000000");

    assert!(f.reports.reports().is_empty());
}

#[tokio::test]
async fn test_send_passes_typed_transfer_to_client() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(1))),
        FixtureOptions::default(),
    );
    let data = Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]);

    f.submitter
        .send(&request().with_data(data.clone()))
        .await
        .unwrap();

    let (to, value, sent) = f.chain.last_submit().unwrap();
    assert_eq!(to.to_string().to_lowercase(), RECIPIENT);
    assert_eq!(value, U256::from(1_000_000_000_000_000u64));
    assert_eq!(sent, data);
}

#[tokio::test]
async fn test_send_without_data_submits_empty_payload() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(1))),
        FixtureOptions::default(),
    );

    f.submitter
        .send(&TransferRequest::new(RECIPIENT, I256::ZERO))
        .await
        .unwrap();

    let (_, value, data) = f.chain.last_submit().unwrap();
    assert_eq!(value, U256::ZERO);
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_send_not_connected() {
    let f = fixture(ScriptedChain::disconnected(), FixtureOptions::default());

    let err = f.submitter.send(&request()).await.unwrap_err();
    assert_eq!(err.to_string(), "Wallet not connected");
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(f.chain.submit_count(), 0);

    let reports = f.reports.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "Wallet not connected");
    let context = reports[0].context.as_ref().unwrap();
    assert_eq!(context["from"], Value::Null);
}

#[tokio::test]
async fn test_send_wrong_network() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(1))).on_chain(1),
        FixtureOptions::default(),
    );

    let err = f.submitter.send(&request()).await.unwrap_err();
    assert!(err.to_string().contains("Base"));
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(f.chain.submit_count(), 0);
    assert_eq!(f.reports.reports().len(), 1);
}

#[tokio::test]
async fn test_send_validation_failures_are_reported() {
    let cases = [
        (TransferRequest::new("", one_wei()), RECIPIENT_REQUIRED),
        (TransferRequest::new("0x123", one_wei()), INVALID_RECIPIENT),
        (TransferRequest::new(RECIPIENT, I256::MINUS_ONE), NEGATIVE_VALUE),
    ];

    for (request, message) in cases {
        let f = fixture(
            ScriptedChain::connected(SubmitScript::Hash(tx_hash(1))),
            FixtureOptions::default(),
        );

        let err = f.submitter.send(&request).await.unwrap_err();
        assert_eq!(err.to_string(), message);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(f.chain.submit_count(), 0);

        let reports = f.reports.reports();
        assert_eq!(reports.len(), 1, "{}", message);
        assert_eq!(reports[0].message, message);
        assert_eq!(reports[0].severity, Severity::Medium);

        let context = reports[0].context.as_ref().unwrap();
        assert_eq!(context["from"], sender().to_string());
        assert_eq!(context["to"], request.to.as_str());
        assert_eq!(context["value"], request.value.to_string());
    }
}

#[tokio::test]
async fn test_negative_cli_amount_reaches_validation() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(1))),
        FixtureOptions::default(),
    );

    let amount = to_signed_wei("-1").unwrap();
    let err = f
        .submitter
        .send(&TransferRequest::new(RECIPIENT, amount))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), NEGATIVE_VALUE);
    assert_eq!(f.chain.submit_count(), 0);

    let reports = f.reports.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, NEGATIVE_VALUE);
}

#[tokio::test]
async fn test_validation_runs_before_connection_check() {
    let f = fixture(ScriptedChain::disconnected(), FixtureOptions::default());

    let err = f
        .submitter
        .send(&TransferRequest::new("", one_wei()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), RECIPIENT_REQUIRED);
}

#[tokio::test]
async fn test_execution_error_propagates_verbatim() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Reject("insufficient funds".to_string())),
        FixtureOptions::default(),
    );

    let err = f.submitter.send(&request()).await.unwrap_err();
    assert_eq!(err.to_string(), "Transaction rejected: insufficient funds");
    assert_eq!(err.kind(), ErrorKind::Execution);
    assert_eq!(f.chain.submit_count(), 1);

    let reports = f.reports.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "Transaction rejected: insufficient funds");
    assert_eq!(reports[0].severity, Severity::Medium);

    let errors: Vec<_> = f
        .console
        .entries()
        .into_iter()
        .filter(|e| e.level == LogLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].context.as_ref().unwrap()["error"]["name"], "ChainError");
}

#[tokio::test]
async fn test_zero_sample_rate_never_forwards() {
    let f = fixture(
        ScriptedChain::disconnected(),
        FixtureOptions {
            sample_rate: 0.0,
            draw: 0.0,
            ..FixtureOptions::default()
        },
    );

    for _ in 0..5 {
        assert!(f.submitter.send(&request()).await.is_err());
    }
    assert!(f.reports.reports().is_empty());
    assert!(f.console.entries().is_empty());
}

#[tokio::test]
async fn test_disabled_reporting_is_silent() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Reject("nope".to_string())),
        FixtureOptions {
            reporting_enabled: false,
            ..FixtureOptions::default()
        },
    );

    let err = f.submitter.send(&request()).await.unwrap_err();
    assert_eq!(err.to_string(), "Transaction rejected: nope");
    assert!(f.reports.reports().is_empty());
    assert!(f.console.entries().is_empty());
}

#[tokio::test]
async fn test_reports_carry_session_and_user() {
    let f = fixture(ScriptedChain::disconnected(), FixtureOptions::default());
    f.store.set(USER_ID_KEY, "user-42");

    f.submitter.send(&request()).await.unwrap_err();
    f.reporter.set_user_id("user-43");
    f.submitter.send(&request()).await.unwrap_err();

    let reports = f.reports.reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].user_id.as_deref(), Some("user-42"));
    assert_eq!(reports[1].user_id.as_deref(), Some("user-43"));
    assert_eq!(reports[0].session_id, f.reporter.session_id());
    assert_eq!(reports[0].session_id, reports[1].session_id);
}

#[tokio::test]
async fn test_repeated_sends_each_submit() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(7))),
        FixtureOptions::default(),
    );

    let request = request();
    let first = f.submitter.send(&request).await.unwrap();
    let second = f.submitter.send(&request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(f.chain.submit_count(), 2);
    assert_eq!(f.console.entries().len(), 2);
}

#[tokio::test]
async fn test_concurrent_sends_are_independent() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(9))),
        FixtureOptions::default(),
    );

    let request = request();
    let (a, b) = tokio::join!(f.submitter.send(&request), f.submitter.send(&request));
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(f.chain.submit_count(), 2);
}

#[tokio::test]
async fn test_debug_level_traces_stages() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(2))),
        FixtureOptions {
            min_level: LogLevel::Debug,
            ..FixtureOptions::default()
        },
    );

    f.submitter.send(&request()).await.unwrap();

    let stages: Vec<String> = f
        .console
        .entries()
        .iter()
        .filter(|e| e.level == LogLevel::Debug)
        .filter_map(|e| e.context.as_ref()?.get("stage")?.as_str().map(String::from))
        .collect();
    assert_eq!(
        stages,
        ["idle", "validating", "checking_connection", "submitting", "succeeded"]
    );
}

#[tokio::test]
async fn test_overview_reports_balance() {
    let f = fixture(
        ScriptedChain::connected(SubmitScript::Hash(tx_hash(1))),
        FixtureOptions::default(),
    );

    let overview = f.submitter.overview().await;
    assert!(overview.is_connected);
    assert_eq!(overview.chain_id, Network::BASE_ID);
    assert_eq!(overview.account, Some(sender()));
    assert_eq!(overview.balance, Some(U256::from(10u64.pow(18))));

    let f = fixture(ScriptedChain::disconnected(), FixtureOptions::default());
    let overview = f.submitter.overview().await;
    assert!(!overview.is_connected);
    assert_eq!(overview.balance, None);
}
