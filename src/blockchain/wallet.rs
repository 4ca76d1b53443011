//! Per-request signing wallet.
//!
//! # Security
//! - Keys are supplied by the user for a single operation and dropped after it
//! - Keys are never logged or serialized
//! - `Debug` shows the derived address only

use alloy::consensus::TxEnvelope;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable the CLI reads a key from when `--key` is absent.
pub const PRIVATE_KEY_ENV_VAR: &str = "LOTTERY_PRIVATE_KEY";

/// Wallet wrapping one local signer.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Parse a 32-byte hex key, with or without `0x`/`0X`, ignoring surrounding
    /// whitespace. The error never echoes the input.
    pub fn from_private_key(input: &str) -> BlockchainResult<Self> {
        let trimmed = input.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let signer: PrivateKeySigner = hex
            .parse()
            .map_err(|_| BlockchainError::Wallet("not a valid 32-byte hex private key".to_string()))?;

        tracing::debug!(address = %signer.address(), "Signer ready");
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a fully populated transaction request.
    ///
    /// The request's `from` must be this wallet's address.
    pub async fn sign_transaction(&self, request: TransactionRequest) -> BlockchainResult<TxEnvelope> {
        let wallet = EthereumWallet::from(self.signer.clone());
        request
            .build(&wallet)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("could not sign: {}", e)))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
