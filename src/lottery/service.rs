//! The lottery service: one contract reference plus the RPC client.
//!
//! Operations are split by concern: `reader.rs` (status queries),
//! `entry.rs` (value transfer), `manager.rs` (two-phase winner selection).

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;

use crate::blockchain::{normalize_address, BlockchainClient, BlockchainError, Wallet};
use crate::config::LotteryConfig;
use crate::explorer::ExplorerLinks;
use crate::lottery::error::{LotteryError, LotteryResult};
use crate::lottery::types::Broadcast;

/// Reads and writes against a single deployed lottery contract.
#[derive(Debug, Clone)]
pub struct LotteryService {
    pub(crate) client: BlockchainClient,
    pub(crate) contract: Address,
    pub(crate) entry_value: U256,
    pub(crate) config: LotteryConfig,
    pub(crate) links: ExplorerLinks,
}

impl LotteryService {
    pub fn new(
        client: BlockchainClient,
        config: LotteryConfig,
        links: ExplorerLinks,
    ) -> LotteryResult<Self> {
        let contract = normalize_address(&config.contract_address)?;
        let entry_value = parse_ether(&config.entry_value_eth)
            .map_err(|_| LotteryError::InvalidAmount(config.entry_value_eth.clone()))?;

        tracing::info!(
            contract = %contract,
            entry_value_wei = %entry_value,
            "Lottery service ready"
        );

        Ok(Self {
            client,
            contract,
            entry_value,
            config,
            links,
        })
    }

    pub fn links(&self) -> &ExplorerLinks {
        &self.links
    }

    /// Call a view function on the contract and decode its return value.
    pub(crate) async fn view<C: SolCall>(
        &self,
        field: &'static str,
        call: C,
    ) -> LotteryResult<C::Return> {
        let data = self
            .client
            .call(self.contract, Bytes::from(call.abi_encode()))
            .await
            .map_err(|source| LotteryError::Read { field, source })?;

        C::abi_decode_returns(&data).map_err(|e| LotteryError::Read {
            field,
            source: BlockchainError::Decode {
                call: C::SIGNATURE,
                message: e.to_string(),
            },
        })
    }

    /// Parse a user-supplied key and check it signs for `expected`.
    pub(crate) fn signer_for(&self, private_key: &str, expected: Address) -> LotteryResult<Wallet> {
        if private_key.trim().is_empty() {
            return Err(LotteryError::MissingSigningKey);
        }
        let wallet = Wallet::from_private_key(private_key)?;
        if wallet.address() != expected {
            return Err(LotteryError::SignerMismatch {
                signer: wallet.address(),
                expected,
            });
        }
        Ok(wallet)
    }

    pub(crate) fn broadcast(&self, tx_hash: TxHash) -> Broadcast {
        Broadcast {
            tx_hash,
            explorer_url: self.links.tx_url(&tx_hash),
        }
    }
}
