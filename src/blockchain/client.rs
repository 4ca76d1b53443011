//! JSON-RPC access with per-call timeouts and ordered failover.
//!
//! Every call goes through `with_failover`, which tries the primary endpoint
//! first and then each failover URL. Each attempt is bounded by
//! `blockchain.rpc_timeout_secs` and recorded in the RPC metrics.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use alloy::transports::TransportResult;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult};
use crate::observability::metrics;

type SharedProvider = Arc<dyn Provider + Send + Sync>;

fn connect(url: url::Url) -> SharedProvider {
    Arc::new(ProviderBuilder::new().connect_http(url))
}

#[derive(Clone)]
pub struct BlockchainClient {
    /// Primary first, then failovers in configured order.
    providers: Vec<SharedProvider>,
    config: BlockchainConfig,
    per_call: Duration,
}

impl BlockchainClient {
    /// Connect lazily to the configured endpoints.
    ///
    /// Only a malformed primary URL is fatal. An unreachable node or a chain
    /// ID mismatch is logged and the console starts anyway, showing read
    /// errors per field.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let primary: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("bad RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let mut providers = vec![connect(primary)];
        for raw in &config.failover_urls {
            match raw.parse() {
                Ok(url) => providers.push(connect(url)),
                Err(e) => tracing::warn!(url = %raw, error = %e, "Skipping failover RPC URL"),
            }
        }

        let client = Self {
            providers,
            per_call: Duration::from_secs(config.rpc_timeout_secs),
            config,
        };

        if let Err(e) = client.verify_chain_id().await {
            tracing::warn!(error = %e, rpc_url = %client.config.rpc_url, "Chain check failed at startup");
        } else {
            tracing::info!(
                rpc_url = %client.config.rpc_url,
                failovers = client.providers.len() - 1,
                chain_id = client.config.chain_id,
                "RPC endpoint verified"
            );
        }

        Ok(client)
    }

    /// Run one RPC operation against each provider in turn.
    ///
    /// Transport failures and timeouts move on to the next provider. A
    /// JSON-RPC error response is the node's answer and is returned as is.
    async fn with_failover<T, F, Fut>(&self, method: &'static str, op: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let started = Instant::now();
        let mut all_timed_out = true;

        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.per_call, op(provider.clone())).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc(method, "ok", started);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    if let Some(payload) = e.as_error_resp() {
                        metrics::record_rpc(method, "rejected", started);
                        return Err(BlockchainError::Rejected {
                            method,
                            message: payload.message.to_string(),
                        });
                    }
                    all_timed_out = false;
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                }
            }
        }

        metrics::record_rpc(method, "failed", started);
        if all_timed_out {
            Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
        } else {
            Err(BlockchainError::Rpc(format!("{} failed on every endpoint", method)))
        }
    }

    /// Signing uses the configured chain ID, so a node on another chain
    /// would only ever reject our transactions.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let actual = self.get_chain_id().await?;
        if actual != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(())
    }

    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        self.with_failover("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.with_failover("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.with_failover("eth_getTransactionCount", |p| async move {
            p.get_transaction_count(address).await
        })
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.with_failover("eth_gasPrice", |p| async move { p.get_gas_price().await })
            .await
    }

    /// Execute a read-only contract call and return the raw return data.
    pub async fn call(&self, to: Address, input: Bytes) -> BlockchainResult<Bytes> {
        self.with_failover("eth_call", |p| {
            let request = TransactionRequest::default()
                .with_to(to)
                .with_input(input.clone());
            async move { p.call(request).await }
        })
        .await
    }

    /// Fetch logs matching a filter.
    pub async fn get_logs(&self, filter: &Filter) -> BlockchainResult<Vec<Log>> {
        self.with_failover("eth_getLogs", |p| {
            let filter = filter.clone();
            async move { p.get_logs(&filter).await }
        })
        .await
    }

    /// Broadcast an EIP-2718 encoded signed transaction.
    ///
    /// Failover resends the same bytes, so the hash cannot change between
    /// providers.
    pub async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        self.with_failover("eth_sendRawTransaction", |p| {
            let raw = raw.clone();
            async move {
                p.send_raw_transaction(&raw)
                    .await
                    .map(|pending| *pending.tx_hash())
            }
        })
        .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Chain ID used for signing.
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("endpoints", &self.providers.len())
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .finish_non_exhaustive()
    }
}
