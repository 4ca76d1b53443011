//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Form / API input (address, private key)
//!     → address.rs (parse, EIP-55 normalization)
//!     → wallet.rs (per-request signer)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → transaction.rs (build, sign, broadcast)
//! ```
//!
//! # Security Constraints
//! - Private keys live only for the request that supplied them
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod address;
pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use address::{normalize_address, AddressError};
pub use client::BlockchainClient;
pub use transaction::{TxBuilder, UnsignedTx};
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult};
pub use wallet::Wallet;
