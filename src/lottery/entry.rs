//! Entering the lottery: a fixed-value transfer to the contract.

use alloy::primitives::Bytes;

use crate::blockchain::{normalize_address, TxBuilder};
use crate::lottery::error::LotteryResult;
use crate::lottery::service::LotteryService;
use crate::lottery::types::Broadcast;
use crate::observability::metrics;

impl LotteryService {
    /// Sign and broadcast an entry transfer from `sender`.
    ///
    /// No retry: if the broadcast fails after the node accepted it, a
    /// second submission may enter twice.
    pub async fn enter(&self, sender: &str, private_key: &str) -> LotteryResult<Broadcast> {
        let result = self.submit_entry(sender, private_key).await;
        metrics::record_action("enter", result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Entry failed");
        }
        result
    }

    async fn submit_entry(&self, sender: &str, private_key: &str) -> LotteryResult<Broadcast> {
        let sender = normalize_address(sender)?;
        let wallet = self.signer_for(private_key, sender)?;

        let builder = TxBuilder::new(&self.client);
        let tx = builder
            .build(
                sender,
                self.contract,
                self.entry_value,
                Bytes::new(),
                self.config.entry_gas_limit,
            )
            .await?;
        let tx_hash = builder.sign_and_send(&wallet, &tx).await?;

        tracing::info!(tx_hash = %tx_hash, sender = %sender, "Entry submitted");
        Ok(self.broadcast(tx_hash))
    }
}
