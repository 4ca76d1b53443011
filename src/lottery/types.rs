//! Read-path result types.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;

use crate::lottery::error::LotteryResult;

/// A wei amount with its ether rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    pub wei: U256,
    pub ether: String,
}

impl Amount {
    pub fn from_wei(wei: U256) -> Self {
        Self {
            wei,
            ether: format_ether(wei),
        }
    }
}

/// One independently read status field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field<T> {
    Value(T),
    Unavailable(String),
}

impl<T> From<LotteryResult<T>> for Field<T> {
    fn from(result: LotteryResult<T>) -> Self {
        match result {
            Ok(value) => Field::Value(value),
            Err(e) => Field::Unavailable(e.to_string()),
        }
    }
}

/// Participant addresses, when small enough to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantList {
    Listed(Vec<Address>),
    TooMany { limit: u64 },
    Unavailable(String),
}

/// A decoded `WinnerSelected` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerEvent {
    pub winner: Address,
    pub amount: Amount,
    pub tx_hash: Option<TxHash>,
    pub block_number: Option<u64>,
}

/// Everything the status panel shows.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub contract: Address,
    pub contract_url: String,
    pub entry_value: Amount,
    pub manager: Field<Address>,
    pub balance: Field<Amount>,
    pub participant_count: u64,
    /// Counting stopped at the status deadline; the true count is at least
    /// `participant_count`.
    pub participant_count_partial: bool,
    pub participants: ParticipantList,
    pub random: Field<U256>,
    pub recent_winners: Field<Vec<WinnerEvent>>,
}

/// Reference to a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Broadcast {
    pub tx_hash: TxHash,
    pub explorer_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lottery::error::LotteryError;

    #[test]
    fn test_amount_renders_ether() {
        let amount = Amount::from_wei(U256::from(10_000_000_000_000u64));
        assert!(amount.ether.starts_with("0.00001"));
    }

    #[test]
    fn test_field_from_error_keeps_message() {
        let field: Field<u64> = Field::from(Err(LotteryError::NoPendingTransaction));
        assert_eq!(
            field,
            Field::Unavailable("no prepared winner transaction in this session".to_string())
        );
    }

    #[test]
    fn test_field_serialization() {
        let field: Field<u64> = Field::Value(3);
        assert_eq!(serde_json::to_value(&field).unwrap(), serde_json::json!({"value": 3}));
    }
}
