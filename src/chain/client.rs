//! The chain capability the submission pipeline depends on.
//!
//! Reads of the connected account and chain are synchronous snapshots;
//! balance reads and submission go over the wire and are async.

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash, U256};

use crate::chain::types::ChainResult;

/// Reads and writes against a chain on behalf of one account.
pub trait ChainClient: Send + Sync {
    /// Chain the client is currently connected to.
    fn current_chain_id(&self) -> u64;

    /// Connected account, `None` when no wallet is connected.
    fn current_address(&self) -> Option<Address>;

    /// Native balance of the connected account.
    fn current_balance(&self) -> impl Future<Output = ChainResult<U256>> + Send;

    /// Sign and broadcast a value transfer. Called at most once per send.
    fn submit(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> impl Future<Output = ChainResult<TxHash>> + Send;
}

impl<C: ChainClient> ChainClient for Arc<C> {
    fn current_chain_id(&self) -> u64 {
        self.as_ref().current_chain_id()
    }

    fn current_address(&self) -> Option<Address> {
        self.as_ref().current_address()
    }

    fn current_balance(&self) -> impl Future<Output = ChainResult<U256>> + Send {
        self.as_ref().current_balance()
    }

    fn submit(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> impl Future<Output = ChainResult<TxHash>> + Send {
        self.as_ref().submit(to, value, data)
    }
}
