//! Console configuration, as read from TOML.
//!
//! This module defines the complete configuration structure for the console.
//! Every section and field is optional; missing ones take the defaults below.

use serde::{Deserialize, Serialize};

/// Root configuration for the lottery console.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Listener configuration (bind address, request limits).
    pub listener: ListenerConfig,

    /// JSON-RPC endpoint settings.
    pub blockchain: BlockchainConfig,

    /// Lottery contract and transaction parameters.
    pub lottery: LotteryConfig,

    /// Block-explorer API and link settings.
    pub explorer: ExplorerConfig,

    /// Session store settings.
    pub session: SessionConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Where the console listens and how long a request may take.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8501").
    pub bind_address: String,

    /// Whole-request deadline in seconds, RPC round trips included.
    pub request_timeout_secs: u64,

    /// Maximum accepted form/JSON body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8501".to_string(),
            request_timeout_secs: 60,
            max_body_size: 64 * 1024,
        }
    }
}

/// Ethereum JSON-RPC endpoints and gas policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Primary node.
    pub rpc_url: String,

    /// Tried in order when the primary is unreachable or times out.
    pub failover_urls: Vec<String>,

    /// Chain ID (11155111 for Sepolia, 31337 for local Anvil).
    pub chain_id: u64,

    /// Per-call, per-endpoint deadline in seconds.
    pub rpc_timeout_secs: u64,

    /// Gas price multiplier (1.0 = node's quote, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Refuse to build transactions above this network gas price.
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 11_155_111,
            rpc_timeout_secs: 10,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: 500,
        }
    }
}

/// Lottery contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LotteryConfig {
    /// Address of the deployed lottery contract.
    pub contract_address: String,

    /// Fixed entry amount, in ether.
    pub entry_value_eth: String,

    /// Gas limit for entry transfers.
    pub entry_gas_limit: u64,

    /// Gas limit for the `selectWinner()` call.
    pub winner_gas_limit: u64,

    /// Upper bound on `participants(i)` probes.
    pub max_probe: u64,

    /// Participant lists longer than this are not fetched.
    pub participant_list_limit: u64,

    /// How far back to scan for `WinnerSelected` events.
    pub event_lookback_blocks: u64,

    /// Reject a held winner transaction once the manager nonce has moved on.
    pub reject_stale_nonce: bool,

    /// Wall-clock budget for one status read, in seconds. Fields not read
    /// in time are reported unavailable and the participant count is marked
    /// partial. Must stay below `listener.request_timeout_secs`.
    pub status_budget_secs: u64,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            contract_address: "0xcbA756ADbDD00cD47F56E2691711567FE0725d97".to_string(),
            entry_value_eth: "0.00001".to_string(),
            entry_gas_limit: 150_000,
            winner_gas_limit: 400_000,
            max_probe: 1_000,
            participant_list_limit: 50,
            event_lookback_blocks: 2_500,
            reject_stale_nonce: true,
            status_budget_secs: 20,
        }
    }
}

/// Block-explorer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Etherscan-compatible API endpoint.
    pub api_url: String,

    /// API key, sent as `apikey` when non-empty.
    pub api_key: String,

    /// Base URL for human-facing `/tx/` and `/address/` links.
    pub web_url: String,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-sepolia.etherscan.io/api".to_string(),
            api_key: String::new(),
            web_url: "https://sepolia.etherscan.io".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle longer than this are dropped, along with any held transaction.
    pub idle_timeout_secs: u64,

    /// How often the sweeper runs.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

/// Logging and Prometheus export.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Level for this crate and tower-http when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Serve Prometheus metrics on `metrics_address`.
    pub metrics_enabled: bool,

    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
