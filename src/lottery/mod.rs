//! Lottery contract console operations.
//!
//! # Data Flow
//! ```text
//! status panel  → reader.rs  → eth_call / eth_getLogs
//! entry form    → entry.rs   → build → sign → eth_sendRawTransaction
//! manager form  → manager.rs → prepare → session.rs slot
//!                            → sign & send (slot + key) → broadcast → clear slot
//! ```

pub mod contract;
pub mod entry;
pub mod error;
pub mod manager;
pub mod reader;
pub mod service;
pub mod session;
pub mod types;

pub use error::{LotteryError, LotteryResult};
pub use reader::probe_array_length;
pub use service::LotteryService;
pub use session::{PendingSummary, PendingTransaction, SessionStore};
pub use types::{Amount, Broadcast, Field, ParticipantList, StatusSnapshot, WinnerEvent};
