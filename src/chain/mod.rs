//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key, RPC URL)
//!     → wallet.rs (key loading, signer)
//!     → rpc.rs (RPC connection with timeouts, chain ID snapshot)
//!     → client.rs (ChainClient capability consumed by the pipeline)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - Every RPC read has a configurable timeout
//! - Graceful degradation when the chain is unreachable

pub mod client;
pub mod rpc;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::ChainClient;
pub use rpc::RpcChainClient;
pub use types::{ChainError, ChainResult, Network};
pub use wallet::Wallet;
