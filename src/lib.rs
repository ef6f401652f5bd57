//! Transfer submission pipeline with structured logging and sampled error
//! reporting.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──▶ pipeline::TransactionSubmitter::send(TransferRequest)
//!                 │
//!                 ├─▶ validation   (pure checks)
//!                 ├─▶ chain        (ChainClient: account, chain ID, submit)
//!                 │
//!                 ├─▶ observability::Logger         (success entry)
//!                 └─▶ observability::ErrorReporter  (every failure)
//!                         ├─▶ Logger::error
//!                         └─▶ report sink (when a DSN is configured)
//!
//!   Cross-cutting: config (read once), storage (user ID, auth token), auth
//! ```

// Core
pub mod chain;
pub mod pipeline;
pub mod validation;

// Cross-cutting concerns
pub mod auth;
pub mod config;
pub mod observability;
pub mod storage;

pub use chain::{ChainClient, Network};
pub use config::AppConfig;
pub use observability::{ErrorReporter, Logger, Severity};
pub use pipeline::{SubmissionOutcome, SubmitError, TransactionSubmitter};
pub use validation::{validate_address, validate_transaction, TransferRequest, ValidationResult};
