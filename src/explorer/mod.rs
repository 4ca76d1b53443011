//! Block-explorer integration: hash validation, lookup, and links.

pub mod client;
pub mod hash;
pub mod links;

use thiserror::Error;

pub use client::{ExplorerClient, LookupOutcome};
pub use hash::validate_tx_hash;
pub use links::ExplorerLinks;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("'{0}' is not a transaction hash (expected 64 hex characters, optional 0x)")]
    InvalidHash(String),

    #[error("explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("explorer error: {0}")]
    Api(String),
}
