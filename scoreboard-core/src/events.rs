//! Ledger change notifications
//!
//! The presentation layer subscribes and re-renders whenever the ledger
//! changes. Events are delivered over a broadcast channel; publishing with
//! nobody listening is fine.

use tokio::sync::broadcast;

use crate::milestone::Milestone;
use crate::model::Transaction;

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    /// A submitted transaction was accepted and appended locally
    TransactionAppended { transaction: Transaction },
    /// The transaction list was replaced by a remote fetch
    TransactionsReplaced { count: usize },
    /// At least one group moved into a higher milestone band
    MilestoneReached { milestone: Milestone },
}

/// Fan-out of ledger events to any number of subscribers
#[derive(Debug, Clone)]
pub struct LedgerEvents {
    tx: broadcast::Sender<LedgerEvent>,
}

impl LedgerEvents {
    /// Create a channel buffering up to `capacity` events per slow subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: LedgerEvent) {
        // No receivers is not an error
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }
}

impl Default for LedgerEvents {
    fn default() -> Self {
        Self::new(64)
    }
}
