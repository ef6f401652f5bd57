//! JSON-RPC backed [`ChainClient`].
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + read failovers)
//! - Snapshot the chain ID at connect time
//! - Query balances with timeouts and failover
//! - Sign and broadcast value transfers through the primary endpoint

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use tokio::time::timeout;

use crate::chain::client::ChainClient;
use crate::chain::types::{ChainError, ChainResult, RpcConfig};
use crate::chain::wallet::Wallet;

/// Chain client over HTTP JSON-RPC.
#[derive(Clone)]
pub struct RpcChainClient {
    /// Read providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Primary provider with the wallet filler, present when a wallet is loaded.
    signer: Option<Arc<dyn Provider + Send + Sync>>,
    wallet: Option<Wallet>,
    config: RpcConfig,
    /// Chain ID observed at the last refresh; 0 when unknown.
    chain_id: Arc<AtomicU64>,
    timeout_duration: Duration,
}

impl RpcChainClient {
    /// Create a client and snapshot the remote chain ID.
    ///
    /// Without a wallet the client is read-only and reports no connected
    /// account.
    pub async fn connect(config: RpcConfig, wallet: Option<Wallet>) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.timeout_secs);

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let mut providers = vec![
            Arc::new(ProviderBuilder::new().connect_http(primary_url.clone()))
                as Arc<dyn Provider + Send + Sync>,
        ];

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url))
                    as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let signer = wallet.as_ref().map(|wallet| {
            Arc::new(
                ProviderBuilder::new()
                    .wallet(wallet.ethereum_wallet())
                    .connect_http(primary_url),
            ) as Arc<dyn Provider + Send + Sync>
        });

        let client = Self {
            providers,
            signer,
            wallet,
            config: config.clone(),
            chain_id: Arc::new(AtomicU64::new(0)),
            timeout_duration,
        };

        match client.refresh_chain_id().await {
            Ok(chain_id) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = chain_id,
                    account = ?client.current_address(),
                    "Chain client initialized"
                );
            }
            Err(e) => {
                // Keep going: an unknown chain fails the network check later.
                tracing::warn!(
                    error = %e,
                    "Chain client initialized but chain ID lookup failed"
                );
            }
        }

        Ok(client)
    }

    /// Query the chain ID and update the cached snapshot.
    pub async fn refresh_chain_id(&self) -> ChainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => {
                    self.chain_id.store(result, Ordering::SeqCst);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ChainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> ChainResult<U256> {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_balance(address)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(ChainError::Rpc("All providers failed to get balance".to_string()))
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> ChainResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_gas_price()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(ChainError::Rpc("All providers failed to get gas price".to_string()))
    }

    /// Build the transfer request, enforcing the gas price ceiling.
    async fn build_transfer(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> ChainResult<TransactionRequest> {
        let gas_price = self.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        if gas_price_gwei > self.config.max_gas_price_gwei as u128 {
            return Err(ChainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: self.config.max_gas_price_gwei,
            });
        }

        // Apply multiplier for safety margin
        let adjusted_gas_price = (gas_price as f64 * self.config.gas_price_multiplier) as u128;

        Ok(TransactionRequest::default()
            .with_to(to)
            .with_value(value)
            .with_input(data)
            .with_gas_price(adjusted_gas_price)
            .with_chain_id(self.current_chain_id()))
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

impl ChainClient for RpcChainClient {
    fn current_chain_id(&self) -> u64 {
        self.chain_id.load(Ordering::SeqCst)
    }

    fn current_address(&self) -> Option<Address> {
        self.wallet.as_ref().map(Wallet::address)
    }

    async fn current_balance(&self) -> ChainResult<U256> {
        let address = self
            .current_address()
            .ok_or_else(|| ChainError::NotAvailable("no wallet connected".to_string()))?;
        self.get_balance(address).await
    }

    async fn submit(&self, to: Address, value: U256, data: Bytes) -> ChainResult<TxHash> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| ChainError::NotAvailable("no signing wallet loaded".to_string()))?;

        let tx = self.build_transfer(to, value, data).await?;

        // No deadline here: once dispatched the broadcast runs to completion.
        let pending = signer
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::Rejected(e.to_string()))?;

        let hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %hash, "Transaction broadcast");
        Ok(hash)
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.current_chain_id())
            .field("account", &self.current_address())
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
