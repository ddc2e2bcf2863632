//! RemoteLedger trait and the submission payload

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SyncError;
use crate::model::{Points, Transaction, TransactionId};

/// Body of a submission to the remote store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub student_id: String,
    pub group_id: String,
    pub delta: Points,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl TransactionDraft {
    /// The record to append locally once the remote store has assigned `id`.
    ///
    /// `fallback_date` fills in a draft submitted without a date.
    pub fn into_transaction(self, id: TransactionId, fallback_date: &str) -> Transaction {
        Transaction {
            id,
            student_id: self.student_id,
            group_id: self.group_id,
            delta: self.delta,
            reason: self.reason,
            date: self.date.unwrap_or_else(|| fallback_date.to_string()),
        }
    }
}

/// Access to the authoritative transaction log
///
/// Each call is a single attempt; there is no retry and no idempotency key,
/// so a caller that repeats a failed submit may create a duplicate.
#[async_trait]
pub trait RemoteLedger: Send + Sync {
    /// Append one transaction, returning the id the remote store assigned.
    async fn submit(&self, draft: &TransactionDraft) -> Result<TransactionId, SyncError>;

    /// Fetch the full transaction list.
    async fn fetch_all(&self) -> Result<Vec<Transaction>, SyncError>;
}
