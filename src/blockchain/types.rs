//! RPC-facing error type.

use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Every provider failed at the transport level.
    #[error("RPC unavailable: {0}")]
    Rpc(String),

    #[error("RPC call timed out after {0}s")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error (revert, nonce too low, ...).
    #[error("{method} rejected: {message}")]
    Rejected {
        method: &'static str,
        message: String,
    },

    /// Return data did not match the expected ABI type.
    #[error("could not decode {call} result: {message}")]
    Decode { call: &'static str, message: String },

    /// Bad private key or signing failure.
    #[error("signer: {0}")]
    Wallet(String),

    #[error("network gas price is {current_gwei} gwei, above the {max_gwei} gwei cap")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    #[error("endpoint serves chain {actual}, configured for {expected}")]
    ChainMismatch { expected: u64, actual: u64 },
}

pub type BlockchainResult<T> = Result<T, BlockchainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        assert_eq!(
            BlockchainError::Timeout(10).to_string(),
            "RPC call timed out after 10s"
        );

        let err = BlockchainError::Rejected {
            method: "eth_call",
            message: "execution reverted".to_string(),
        };
        assert_eq!(err.to_string(), "eth_call rejected: execution reverted");

        let err = BlockchainError::GasPriceTooHigh {
            current_gwei: 600,
            max_gwei: 500,
        };
        assert_eq!(
            err.to_string(),
            "network gas price is 600 gwei, above the 500 gwei cap"
        );

        let err = BlockchainError::ChainMismatch {
            expected: 11_155_111,
            actual: 1,
        };
        assert!(err.to_string().contains("chain 1"));
    }
}
