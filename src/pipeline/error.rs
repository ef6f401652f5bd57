//! Failure taxonomy for transfer submission.

use thiserror::Error;

use crate::chain::types::ChainError;
use crate::observability::reporter::Severity;
use crate::validation::ValidationError;

/// Why a `send` was aborted. `Display` is the user-facing message.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Caller-supplied data failed a pure check.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No account is connected.
    #[error("Wallet not connected")]
    NotConnected,

    /// Connected to a chain other than the required one.
    #[error("Wrong network. Please switch to {expected}")]
    WrongNetwork { expected: String, actual: u64 },

    /// The chain client failed to submit; carried verbatim.
    #[error(transparent)]
    Execution(#[from] ChainError),
}

/// Coarse classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input; fixable by the caller.
    Validation,
    /// Environment not ready; fixable by user action.
    Precondition,
    /// The chain rejected or failed the submission.
    Execution,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Execution => "execution",
        }
    }
}

impl SubmitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::Validation(_) => ErrorKind::Validation,
            SubmitError::NotConnected | SubmitError::WrongNetwork { .. } => ErrorKind::Precondition,
            SubmitError::Execution(_) => ErrorKind::Execution,
        }
    }

    /// Severity the pipeline reports this failure at.
    pub fn severity(&self) -> Severity {
        Severity::Medium
    }
}
