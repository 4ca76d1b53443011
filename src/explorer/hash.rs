//! Transaction-hash format validation.

use alloy::primitives::TxHash;
use std::str::FromStr;

use crate::explorer::ExplorerError;

/// Accept exactly 64 hex characters, optionally prefixed with `0x`.
pub fn validate_tx_hash(input: &str) -> Result<TxHash, ExplorerError> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if body.len() != 64 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ExplorerError::InvalidHash(trimmed.to_string()));
    }

    TxHash::from_str(body).map_err(|_| ExplorerError::InvalidHash(trimmed.to_string()))
}
