//! Per-session pending-transaction slot.
//!
//! A session holds at most one prepared winner transaction. A new prepare
//! clobbers the held one; nothing is queued and nothing is persisted.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::blockchain::UnsignedTx;

/// A prepared, unsigned transaction waiting for a signature.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub tx: UnsignedTx,
    prepared_at: Instant,
}

impl PendingTransaction {
    pub fn new(tx: UnsignedTx) -> Self {
        Self {
            tx,
            prepared_at: Instant::now(),
        }
    }

    /// Time since the transaction was prepared.
    pub fn age(&self) -> Duration {
        self.prepared_at.elapsed()
    }

    pub fn summary(&self) -> PendingSummary {
        PendingSummary {
            tx: self.tx.clone(),
            age_secs: self.age().as_secs(),
        }
    }
}

/// Serializable view of a held transaction.
#[derive(Debug, Clone, Serialize)]
pub struct PendingSummary {
    #[serde(flatten)]
    pub tx: UnsignedTx,
    pub age_secs: u64,
}

#[derive(Debug)]
struct Session {
    pending: Option<PendingTransaction>,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            pending: None,
            last_seen: Instant::now(),
        }
    }
}

/// In-memory session map keyed by random UUIDs.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    /// The caller's session ID if it names a live session. Never creates
    /// one, so read-only requests leave the map alone.
    pub fn touch(&self, id: Option<Uuid>) -> Option<Uuid> {
        let id = id?;
        let mut session = self.sessions.get_mut(&id)?;
        session.last_seen = Instant::now();
        Some(id)
    }

    /// Return the caller's session ID, creating a fresh session when the
    /// ID is missing or unknown (e.g. swept). Only prepare needs this.
    pub fn resolve(&self, id: Option<Uuid>) -> Uuid {
        if let Some(id) = id {
            if let Some(mut session) = self.sessions.get_mut(&id) {
                session.last_seen = Instant::now();
                return id;
            }
        }
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::new());
        tracing::debug!(session = %id, "Session created");
        id
    }

    /// Store a prepared transaction, returning the one it replaced.
    pub fn hold(&self, id: Uuid, pending: PendingTransaction) -> Option<PendingTransaction> {
        let mut session = self.sessions.entry(id).or_insert_with(Session::new);
        session.last_seen = Instant::now();
        session.pending.replace(pending)
    }

    /// Copy of the held transaction, if any.
    pub fn pending(&self, id: Uuid) -> Option<PendingTransaction> {
        self.sessions.get(&id).and_then(|s| s.pending.clone())
    }

    /// Clear the held transaction only if it still satisfies `predicate`.
    pub fn clear_if<F>(&self, id: Uuid, predicate: F) -> bool
    where
        F: FnOnce(&PendingTransaction) -> bool,
    {
        match self.sessions.get_mut(&id) {
            Some(mut session) => {
                if session.pending.as_ref().is_some_and(predicate) {
                    session.pending = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Drop sessions idle longer than the timeout.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        let idle_timeout = self.idle_timeout;
        self.sessions
            .retain(|_, session| session.last_seen.elapsed() < idle_timeout);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Periodically sweep until shutdown.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        every: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = self.sweep();
                        if removed > 0 {
                            tracing::debug!(removed, remaining = self.len(), "Swept idle sessions");
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }
        })
    }
}
