//! Read-path queries: balance, manager, random preview, participants, events.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use crate::lottery::contract::ILottery;
use crate::lottery::error::{LotteryError, LotteryResult};
use crate::lottery::service::LotteryService;
use crate::lottery::types::{Amount, Field, ParticipantList, StatusSnapshot, WinnerEvent};

/// Most recent winner events kept in a snapshot.
const RECENT_WINNERS: usize = 10;

/// Count consecutive successful probes starting at index 0.
///
/// The first failure of any kind ends the count, so a transient RPC error
/// looks exactly like the end of the array. Stops at `limit`.
pub async fn probe_array_length<T, E, F, Fut>(limit: u64, mut probe: F) -> u64
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut count = 0;
    while count < limit {
        match probe(count).await {
            Ok(_) => count += 1,
            Err(e) => {
                tracing::debug!(index = count, error = %e, "Probe ended");
                return count;
            }
        }
    }
    tracing::warn!(limit, "Probe limit reached, count may be truncated");
    count
}

impl LotteryService {
    /// `getContractBalance()`.
    pub async fn contract_balance(&self) -> LotteryResult<Amount> {
        self.view("contract balance", ILottery::getContractBalanceCall {})
            .await
            .map(Amount::from_wei)
    }

    /// `random()`; a preview only, not a secure random source.
    pub async fn random_preview(&self) -> LotteryResult<U256> {
        self.view("random()", ILottery::randomCall {}).await
    }

    /// `manager()`.
    pub async fn manager(&self) -> LotteryResult<Address> {
        self.view("manager", ILottery::managerCall {}).await
    }

    /// `getPlayers()`.
    pub async fn players(&self) -> LotteryResult<Vec<Address>> {
        self.view("participants", ILottery::getPlayersCall {}).await
    }

    /// `participants(index)`.
    pub async fn participant_at(&self, index: u64) -> LotteryResult<Address> {
        self.view(
            "participant",
            ILottery::participantsCall {
                index: U256::from(index),
            },
        )
        .await
    }

    /// `WinnerSelected` events in the lookback window, newest first.
    pub async fn recent_winners(&self) -> LotteryResult<Vec<WinnerEvent>> {
        let latest = self
            .client
            .get_block_number()
            .await
            .map_err(|source| LotteryError::Read { field: "latest block", source })?;
        let from_block = latest.saturating_sub(self.config.event_lookback_blocks);

        let filter = Filter::new()
            .address(self.contract)
            .from_block(from_block)
            .to_block(latest)
            .event(ILottery::WinnerSelected::SIGNATURE);

        let logs = self
            .client
            .get_logs(&filter)
            .await
            .map_err(|source| LotteryError::Read { field: "events", source })?;

        let mut winners: Vec<WinnerEvent> = logs
            .iter()
            .filter_map(|log| {
                let decoded = log.log_decode::<ILottery::WinnerSelected>().ok()?;
                Some(WinnerEvent {
                    winner: decoded.inner.winner,
                    amount: Amount::from_wei(decoded.inner.amount),
                    tx_hash: log.transaction_hash,
                    block_number: log.block_number,
                })
            })
            .collect();
        winners.reverse();
        winners.truncate(RECENT_WINNERS);
        Ok(winners)
    }

    /// Read every status field; a failing field never fails the snapshot.
    ///
    /// All reads share one `status_budget_secs` deadline. Fields still
    /// outstanding when it passes are reported unavailable, and the
    /// participant count is flagged partial if counting was cut short.
    pub async fn status(&self) -> StatusSnapshot {
        let deadline = Instant::now() + Duration::from_secs(self.config.status_budget_secs);

        let (manager, balance, random, recent_winners, counted) = tokio::join!(
            self.within(deadline, "manager", self.manager()),
            self.within(deadline, "contract balance", self.contract_balance()),
            self.within(deadline, "random()", self.random_preview()),
            self.within(deadline, "events", self.recent_winners()),
            self.participants_within(deadline),
        );
        let (participant_count, participant_count_partial, participants) = counted;

        StatusSnapshot {
            contract: self.contract,
            contract_url: self.links.address_url(&self.contract),
            entry_value: Amount::from_wei(self.entry_value),
            manager,
            balance,
            participant_count,
            participant_count_partial,
            participants,
            random,
            recent_winners,
        }
    }

    fn over_budget(&self, field: &'static str) -> LotteryError {
        LotteryError::StatusDeadline {
            field,
            secs: self.config.status_budget_secs,
        }
    }

    async fn within<T>(
        &self,
        deadline: Instant,
        field: &'static str,
        read: impl Future<Output = LotteryResult<T>>,
    ) -> Field<T> {
        match timeout_at(deadline, read).await {
            Ok(result) => Field::from(result),
            Err(_) => Field::Unavailable(self.over_budget(field).to_string()),
        }
    }

    async fn participants_within(&self, deadline: Instant) -> (u64, bool, ParticipantList) {
        let expired = AtomicBool::new(false);
        let flag = &expired;
        let count = probe_array_length(self.config.max_probe, |index| async move {
            match timeout_at(deadline, self.participant_at(index)).await {
                Ok(result) => result,
                Err(_) => {
                    flag.store(true, Ordering::Relaxed);
                    Err(self.over_budget("participant count"))
                }
            }
        })
        .await;

        if expired.load(Ordering::Relaxed) {
            tracing::warn!(
                counted = count,
                budget_secs = self.config.status_budget_secs,
                "Participant count cut short by status deadline"
            );
            let list = ParticipantList::Unavailable(self.over_budget("participants").to_string());
            return (count, true, list);
        }

        let limit = self.config.participant_list_limit;
        let list = if count == 0 {
            ParticipantList::Listed(Vec::new())
        } else if count > limit {
            ParticipantList::TooMany { limit }
        } else {
            match timeout_at(deadline, self.players()).await {
                Ok(Ok(players)) => ParticipantList::Listed(players),
                Ok(Err(e)) => ParticipantList::Unavailable(e.to_string()),
                Err(_) => ParticipantList::Unavailable(self.over_budget("participants").to_string()),
            }
        };
        (count, false, list)
    }
}
