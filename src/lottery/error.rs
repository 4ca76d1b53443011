//! Lottery operation errors.

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::{AddressError, BlockchainError};

#[derive(Debug, Error)]
pub enum LotteryError {
    #[error("could not read {field}: {source}")]
    Read {
        field: &'static str,
        #[source]
        source: BlockchainError,
    },

    #[error("{field} not read within the {secs}s status budget")]
    StatusDeadline { field: &'static str, secs: u64 },

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("invalid entry amount '{0}'")]
    InvalidAmount(String),

    #[error("no prepared winner transaction in this session")]
    NoPendingTransaction,

    #[error("a private key is required to sign")]
    MissingSigningKey,

    #[error("signing key belongs to {signer}, not {expected}")]
    SignerMismatch { signer: Address, expected: Address },

    #[error("prepared transaction is stale (nonce {held}, account is at {current}); prepare it again")]
    StaleTransaction { held: u64, current: u64 },
}

pub type LotteryResult<T> = Result<T, LotteryError>;
