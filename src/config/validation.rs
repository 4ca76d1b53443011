//! Configuration validation.
//!
//! Serde handles syntax; this module checks values: timeouts are non-zero,
//! addresses and URLs parse, the entry amount is a valid ether quantity.
//! All problems are collected, not just the first.

use alloy::primitives::utils::parse_ether;
use std::net::SocketAddr;

use crate::blockchain::address::normalize_address;
use crate::config::schema::ConsoleConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, returning every error found.
pub fn validate_config(config: &ConsoleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    if url::Url::parse(&config.blockchain.rpc_url).is_err() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}' is not a URL", config.blockchain.rpc_url),
        ));
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if config.blockchain.chain_id == 0 {
        errors.push(ValidationError::new("blockchain.chain_id", "must be > 0"));
    }
    if !(config.blockchain.gas_price_multiplier >= 1.0) {
        errors.push(ValidationError::new(
            "blockchain.gas_price_multiplier",
            "must be >= 1.0",
        ));
    }

    if let Err(e) = normalize_address(&config.lottery.contract_address) {
        errors.push(ValidationError::new("lottery.contract_address", e.to_string()));
    }
    match parse_ether(&config.lottery.entry_value_eth) {
        Ok(value) if value.is_zero() => {
            errors.push(ValidationError::new("lottery.entry_value_eth", "must be > 0"));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("lottery.entry_value_eth", e.to_string())),
    }
    if config.lottery.entry_gas_limit < 21_000 {
        errors.push(ValidationError::new("lottery.entry_gas_limit", "must be >= 21000"));
    }
    if config.lottery.winner_gas_limit < 21_000 {
        errors.push(ValidationError::new("lottery.winner_gas_limit", "must be >= 21000"));
    }
    if config.lottery.max_probe == 0 {
        errors.push(ValidationError::new("lottery.max_probe", "must be > 0"));
    }
    if config.lottery.status_budget_secs == 0
        || config.lottery.status_budget_secs >= config.listener.request_timeout_secs
    {
        errors.push(ValidationError::new(
            "lottery.status_budget_secs",
            format!(
                "must be > 0 and below listener.request_timeout_secs ({})",
                config.listener.request_timeout_secs
            ),
        ));
    }

    if url::Url::parse(&config.explorer.api_url).is_err() {
        errors.push(ValidationError::new(
            "explorer.api_url",
            format!("'{}' is not a URL", config.explorer.api_url),
        ));
    }
    if config.explorer.timeout_secs == 0 {
        errors.push(ValidationError::new("explorer.timeout_secs", "must be > 0"));
    }

    if config.session.idle_timeout_secs == 0 {
        errors.push(ValidationError::new("session.idle_timeout_secs", "must be > 0"));
    }
    if config.session.sweep_interval_secs == 0 {
        errors.push(ValidationError::new("session.sweep_interval_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
