//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

// The chain client is configured from the `[rpc]` config section.
pub use crate::config::schema::RpcConfig;

/// A named network with its block explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: u64,
    pub name: String,
    /// Explorer base URL without trailing slash. Empty when unknown.
    pub explorer_url: String,
}

impl Network {
    pub const BASE_ID: u64 = 8453;
    pub const BASE_GOERLI_ID: u64 = 84531;

    pub fn base() -> Self {
        Self {
            id: Self::BASE_ID,
            name: "Base".to_string(),
            explorer_url: "https://basescan.org".to_string(),
        }
    }

    pub fn base_goerli() -> Self {
        Self {
            id: Self::BASE_GOERLI_ID,
            name: "Base Goerli".to_string(),
            explorer_url: "https://goerli.basescan.org".to_string(),
        }
    }

    /// Look up a built-in network.
    pub fn by_id(id: u64) -> Option<Self> {
        match id {
            Self::BASE_ID => Some(Self::base()),
            Self::BASE_GOERLI_ID => Some(Self::base_goerli()),
            _ => None,
        }
    }

    /// Explorer link for a transaction. `None` when no explorer is known.
    pub fn tx_explorer_url(&self, hash: &TxHash) -> Option<String> {
        self.explorer_link("tx", &hash.to_string())
    }

    /// Explorer link for an account.
    pub fn address_explorer_url(&self, address: &Address) -> Option<String> {
        self.explorer_link("address", &address.to_string())
    }

    fn explorer_link(&self, kind: &str, item: &str) -> Option<String> {
        if self.explorer_url.is_empty() {
            return None;
        }
        Some(format!("{}/{}/{}", self.explorer_url, kind, item))
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::base()
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The network or client refused the transaction.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Amount could not be converted between units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Client has no signer or is otherwise unable to act.
    #[error("Chain client not available: {0}")]
    NotAvailable(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
