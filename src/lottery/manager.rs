//! Privileged winner selection in two phases.
//!
//! Prepare builds the unsigned `selectWinner()` call and parks it in the
//! caller's session. Sign & send needs that held transaction plus a key;
//! without both nothing is broadcast.

use alloy::primitives::{Bytes, U256};
use alloy::sol_types::SolCall;
use uuid::Uuid;

use crate::blockchain::{normalize_address, TxBuilder};
use crate::lottery::contract::ILottery;
use crate::lottery::error::{LotteryError, LotteryResult};
use crate::lottery::service::LotteryService;
use crate::lottery::session::{PendingTransaction, SessionStore};
use crate::lottery::types::Broadcast;
use crate::observability::metrics;

impl LotteryService {
    /// Phase 1: build the winner transaction and hold it in the session.
    ///
    /// `manager` is used when given and a valid address; otherwise the
    /// on-chain `manager()` is the sender.
    pub async fn prepare_winner(
        &self,
        sessions: &SessionStore,
        session: Uuid,
        manager: Option<&str>,
    ) -> LotteryResult<PendingTransaction> {
        let result = self.build_winner_tx(manager).await;
        metrics::record_action("prepare_winner", result.is_ok());
        let pending = result?;

        if let Some(previous) = sessions.hold(session, pending.clone()) {
            tracing::info!(
                session = %session,
                previous_nonce = previous.tx.nonce,
                "Replaced previously prepared winner transaction"
            );
        }
        tracing::info!(
            session = %session,
            manager = %pending.tx.from,
            nonce = pending.tx.nonce,
            "Winner transaction prepared"
        );
        Ok(pending)
    }

    async fn build_winner_tx(&self, manager: Option<&str>) -> LotteryResult<PendingTransaction> {
        let supplied = manager
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .and_then(|input| match normalize_address(input) {
                Ok(address) => Some(address),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring supplied manager, using on-chain manager()");
                    None
                }
            });
        let manager = match supplied {
            Some(address) => address,
            None => self.manager().await?,
        };

        let input = Bytes::from(ILottery::selectWinnerCall {}.abi_encode());
        let tx = TxBuilder::new(&self.client)
            .build(
                manager,
                self.contract,
                U256::ZERO,
                input,
                self.config.winner_gas_limit,
            )
            .await?;
        Ok(PendingTransaction::new(tx))
    }

    /// Phase 2: sign the held transaction with `private_key` and broadcast it.
    ///
    /// The slot is cleared after a successful broadcast, or when the held
    /// nonce is found stale. Other failures keep it for another attempt.
    pub async fn send_winner(
        &self,
        sessions: &SessionStore,
        session: Uuid,
        private_key: &str,
    ) -> LotteryResult<Broadcast> {
        let result = self.sign_held_winner(sessions, session, private_key).await;
        metrics::record_action("send_winner", result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(session = %session, error = %e, "Winner transaction not sent");
        }
        result
    }

    async fn sign_held_winner(
        &self,
        sessions: &SessionStore,
        session: Uuid,
        private_key: &str,
    ) -> LotteryResult<Broadcast> {
        let pending = sessions
            .pending(session)
            .ok_or(LotteryError::NoPendingTransaction)?;
        let wallet = self.signer_for(private_key, pending.tx.from)?;

        if self.config.reject_stale_nonce {
            let current = self.client.get_transaction_count(pending.tx.from).await?;
            if current > pending.tx.nonce {
                sessions.clear_if(session, |held| held.tx == pending.tx);
                return Err(LotteryError::StaleTransaction {
                    held: pending.tx.nonce,
                    current,
                });
            }
        }

        tracing::debug!(
            age_secs = pending.age().as_secs(),
            gas_price = pending.tx.gas_price,
            "Signing held winner transaction"
        );
        let tx_hash = TxBuilder::new(&self.client)
            .sign_and_send(&wallet, &pending.tx)
            .await?;

        // A prepare that raced this send keeps its own slot.
        sessions.clear_if(session, |held| held.tx == pending.tx);
        Ok(self.broadcast(tx_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{BlockchainClient, UnsignedTx};
    use crate::config::{BlockchainConfig, LotteryConfig};
    use crate::explorer::ExplorerLinks;
    use alloy::primitives::Address;
    use std::time::Duration;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const OTHER_PRIVATE_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    async fn offline_service() -> LotteryService {
        let client = BlockchainClient::new(BlockchainConfig {
            rpc_url: "http://127.0.0.1:9".to_string(),
            rpc_timeout_secs: 1,
            chain_id: 31337,
            ..BlockchainConfig::default()
        })
        .await
        .unwrap();
        LotteryService::new(
            client,
            LotteryConfig::default(),
            ExplorerLinks::new("https://sepolia.etherscan.io"),
        )
        .unwrap()
    }

    fn held_tx(from: Address) -> PendingTransaction {
        PendingTransaction::new(UnsignedTx {
            from,
            to: Address::repeat_byte(0x22),
            value: U256::ZERO,
            input: Bytes::from(ILottery::selectWinnerCall {}.abi_encode()),
            nonce: 0,
            gas_limit: 400_000,
            gas_price: 1_000_000_000,
            chain_id: 31337,
        })
    }

    #[tokio::test]
    async fn test_send_without_prepare_is_rejected() {
        let service = offline_service().await;
        let sessions = SessionStore::new(Duration::from_secs(60));
        let session = sessions.resolve(None);

        let err = service
            .send_winner(&sessions, session, TEST_PRIVATE_KEY)
            .await
            .unwrap_err();
        assert!(matches!(err, LotteryError::NoPendingTransaction));
    }

    #[tokio::test]
    async fn test_send_without_key_keeps_pending() {
        let service = offline_service().await;
        let sessions = SessionStore::new(Duration::from_secs(60));
        let session = sessions.resolve(None);

        sessions.hold(session, held_tx(Address::repeat_byte(0x11)));
        let err = service.send_winner(&sessions, session, "  ").await.unwrap_err();
        assert!(matches!(err, LotteryError::MissingSigningKey));
        assert!(sessions.pending(session).is_some());
    }

    #[tokio::test]
    async fn test_send_with_wrong_key_is_rejected() {
        let service = offline_service().await;
        let sessions = SessionStore::new(Duration::from_secs(60));
        let session = sessions.resolve(None);
        let manager = crate::blockchain::Wallet::from_private_key(TEST_PRIVATE_KEY)
            .unwrap()
            .address();

        sessions.hold(session, held_tx(manager));
        let err = service
            .send_winner(&sessions, session, OTHER_PRIVATE_KEY)
            .await
            .unwrap_err();
        assert!(matches!(err, LotteryError::SignerMismatch { expected, .. } if expected == manager));
        assert!(sessions.pending(session).is_some());
    }

    #[tokio::test]
    async fn test_prepare_invalid_manager_falls_back_to_chain() {
        let service = offline_service().await;
        let sessions = SessionStore::new(Duration::from_secs(60));
        let session = sessions.resolve(None);

        // The fallback reads manager() from the (unreachable) node.
        let err = service
            .prepare_winner(&sessions, session, Some("0xnot-an-address"))
            .await
            .unwrap_err();
        assert!(matches!(err, LotteryError::Read { field: "manager", .. }));
        assert!(sessions.pending(session).is_none());
    }
}
