//! In-process remote store for tests
//!
//! MockRemote behaves like the real transaction log: submissions are
//! appended with sequential ids and `fetch_all` returns everything appended
//! so far. Failures can be queued to exercise the degraded paths.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::traits::{RemoteLedger, TransactionDraft};
use crate::error::SyncError;
use crate::model::{Transaction, TransactionId};

#[derive(Default)]
struct Inner {
    log: Vec<Transaction>,
    submitted: Vec<TransactionDraft>,
    failures: VecDeque<SyncError>,
    next_id: u64,
}

/// Mock implementation of [`RemoteLedger`]
#[derive(Default)]
pub struct MockRemote {
    inner: Mutex<Inner>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing remote log
    pub fn with_transactions(log: Vec<Transaction>) -> Self {
        let remote = Self::new();
        remote.lock().log = log;
        remote
    }

    /// Make the next call (submit or fetch) fail with `error`
    pub fn queue_failure(&self, error: SyncError) {
        self.lock().failures.push_back(error);
    }

    /// Drafts received by `submit`, including ones that were then failed
    pub fn submitted(&self) -> Vec<TransactionDraft> {
        self.lock().submitted.clone()
    }

    /// Current remote log
    pub fn log(&self) -> Vec<Transaction> {
        self.lock().log.clone()
    }

    /// Append directly to the remote log, as another client would
    pub fn push_remote(&self, tx: Transaction) {
        self.lock().log.push(tx);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RemoteLedger for MockRemote {
    async fn submit(&self, draft: &TransactionDraft) -> Result<TransactionId, SyncError> {
        let mut inner = self.lock();
        inner.submitted.push(draft.clone());
        if let Some(error) = inner.failures.pop_front() {
            return Err(error);
        }

        inner.next_id += 1;
        let id = format!("remote-{}", inner.next_id);
        let tx = draft.clone().into_transaction(id.clone(), "");
        inner.log.push(tx);
        Ok(id)
    }

    async fn fetch_all(&self) -> Result<Vec<Transaction>, SyncError> {
        let mut inner = self.lock();
        if let Some(error) = inner.failures.pop_front() {
            return Err(error);
        }
        Ok(inner.log.clone())
    }
}
