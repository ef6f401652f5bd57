//! Transfer submission pipeline.
//!
//! # Data Flow
//! ```text
//! send(TransferRequest)
//!     → validation (pure)
//!     → connection check (ChainClient::current_address)
//!     → network check (ChainClient::current_chain_id)
//!     → ChainClient::submit
//!     → Logger::info("Transaction sent")        on success
//!     → ErrorReporter::report(.., medium, ..)   on any failure, then Err
//! ```

pub mod error;
pub mod submitter;

pub use error::{ErrorKind, SubmitError};
pub use submitter::{
    AccountOverview, SubmissionOutcome, SubmissionStage, SubmissionStatus, TransactionSubmitter,
};
