//! Transaction building, signing, and broadcast.
//!
//! # Responsibilities
//! - Build unsigned legacy transactions from chain nonce and gas price
//! - Guard against gas price spikes
//! - Sign locally and broadcast the raw envelope

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use serde::Serialize;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;

/// An unsigned transaction with every field fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsignedTx {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: u64,
}

impl UnsignedTx {
    /// Convert into an RPC transaction request.
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_value(self.value)
            .with_input(self.input.clone())
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
            .with_chain_id(self.chain_id)
    }
}

/// Transaction builder for the console's transfers and contract calls.
pub struct TxBuilder<'a> {
    client: &'a BlockchainClient,
}

impl<'a> TxBuilder<'a> {
    /// Create a new transaction builder.
    pub fn new(client: &'a BlockchainClient) -> Self {
        Self { client }
    }

    /// Current gas price with multiplier applied, rejected above the configured cap.
    pub async fn gas_price(&self) -> BlockchainResult<u128> {
        let gas_price = self.client.get_gas_price().await?;
        let config = self.client.config();
        apply_gas_policy(gas_price, config.gas_price_multiplier, config.max_gas_price_gwei)
    }

    /// Build an unsigned transaction using the sender's current nonce.
    ///
    /// # Arguments
    /// * `from` - Sender; its pending nonce is fetched from the chain
    /// * `to` - Destination address
    /// * `value` - Amount of native token to send
    /// * `input` - Call data (empty for simple transfers)
    /// * `gas_limit` - Fixed gas limit
    pub async fn build(
        &self,
        from: Address,
        to: Address,
        value: U256,
        input: Bytes,
        gas_limit: u64,
    ) -> BlockchainResult<UnsignedTx> {
        let nonce = self.client.get_transaction_count(from).await?;
        let gas_price = self.gas_price().await?;

        Ok(UnsignedTx {
            from,
            to,
            value,
            input,
            nonce,
            gas_limit,
            gas_price,
            chain_id: self.client.chain_id(),
        })
    }

    /// Sign locally and broadcast.
    pub async fn sign_and_send(&self, wallet: &Wallet, tx: &UnsignedTx) -> BlockchainResult<TxHash> {
        let envelope = wallet.sign_transaction(tx.to_request()).await?;
        let raw = Bytes::from(envelope.encoded_2718());
        let tx_hash = self.client.send_raw_transaction(raw).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            from = %tx.from,
            to = %tx.to,
            nonce = tx.nonce,
            "Transaction broadcast"
        );
        Ok(tx_hash)
    }
}

fn apply_gas_policy(gas_price: u128, multiplier: f64, max_gwei: u64) -> BlockchainResult<u128> {
    let gas_price_gwei = gas_price / 1_000_000_000;
    if gas_price_gwei > max_gwei as u128 {
        return Err(BlockchainError::GasPriceTooHigh {
            current_gwei: gas_price_gwei as u64,
            max_gwei,
        });
    }
    Ok((gas_price as f64 * multiplier) as u128)
}
