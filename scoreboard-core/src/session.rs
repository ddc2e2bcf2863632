//! Scoreboard session
//!
//! [`Scoreboard`] is the context object a presentation layer holds for the
//! length of a session. It owns the [`LedgerStore`] and is the only thing
//! that mutates it; every query recomputes from the current ledger.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::aggregate::{self, Totals};
use crate::error::{AwardError, DataError, ScoreboardError, SyncError};
use crate::events::{LedgerEvent, LedgerEvents};
use crate::ledger::LedgerStore;
use crate::milestone::{Milestone, MilestoneDetector};
use crate::model::{Dataset, Group, Points, Student, Transaction, normalize_date, normalize_reason};
use crate::profile::{self, Profile};
use crate::ranking::{self, Filter, RankedEntry};
use crate::state::{PROFILE_CODE_KEY, StateStore};
use crate::sync::{RemoteLedger, TransactionDraft};
use crate::tiers::{self, TierStatus};

/// A teacher-issued point adjustment, before submission
#[derive(Debug, Clone, PartialEq)]
pub struct Award {
    pub student_id: String,
    pub delta: Points,
    /// Empty means "Adjustment"
    pub reason: String,
    /// `YYYY-MM-DD`; defaults to the day of submission
    pub date: Option<String>,
}

pub struct Scoreboard {
    store: LedgerStore,
    remote: Arc<dyn RemoteLedger>,
    state: Arc<dyn StateStore>,
    detector: MilestoneDetector,
    events: LedgerEvents,
}

impl Scoreboard {
    /// Load `dataset` and start a session.
    pub fn open(
        dataset: Dataset,
        remote: Arc<dyn RemoteLedger>,
        state: Arc<dyn StateStore>,
    ) -> Result<Self, DataError> {
        Ok(Self {
            store: LedgerStore::load_dataset(dataset)?,
            remote,
            state,
            detector: MilestoneDetector::default(),
            events: LedgerEvents::default(),
        })
    }

    /// Replace the milestone detector (custom band width).
    pub fn with_detector(mut self, detector: MilestoneDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Points per milestone band.
    pub fn milestone_interval(&self) -> Points {
        self.detector.interval()
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    pub fn group_totals(&self) -> Totals {
        aggregate::totals_by_group(&self.store)
    }

    pub fn student_totals(&self) -> Totals {
        aggregate::totals_by_student(&self.store)
    }

    pub fn group_board(&self, filters: &[Filter]) -> Vec<RankedEntry<'_, Group>> {
        ranking::rank(self.store.groups(), &self.group_totals(), filters)
    }

    pub fn student_board(&self, filters: &[Filter]) -> Vec<RankedEntry<'_, Student>> {
        ranking::rank(self.store.students(), &self.student_totals(), filters)
    }

    pub fn tiers_for(&self, points: Points) -> TierStatus {
        tiers::resolve(points, self.store.tiers())
    }

    /// Run a milestone pass over the current group totals.
    ///
    /// Publishes [`LedgerEvent::MilestoneReached`] when any group crossed.
    pub fn check_milestones(&self) -> Option<Milestone> {
        let milestone = self.detector.check(self.state.as_ref(), &self.group_totals())?;
        info!(groups = ?milestone.group_ids(), "Milestone reached");
        self.events.publish(LedgerEvent::MilestoneReached {
            milestone: milestone.clone(),
        });
        Some(milestone)
    }

    /// Submit an award to the remote store and append it locally.
    ///
    /// The group is taken from the student's current membership and recorded
    /// on the transaction. Nothing is appended unless the remote store
    /// accepted the submission.
    pub async fn award(&mut self, award: Award) -> Result<Transaction, ScoreboardError> {
        if !award.delta.is_finite() {
            return Err(AwardError::InvalidDelta(award.delta).into());
        }
        if award.delta == 0.0 {
            return Err(AwardError::ZeroDelta.into());
        }
        let date = match award.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_award_date(raw)?),
        };
        let group_id = self
            .store
            .student(&award.student_id)
            .map(|s| s.group_id.clone())
            .ok_or_else(|| AwardError::UnknownStudent(award.student_id.clone()))?;

        let draft = TransactionDraft {
            student_id: award.student_id,
            group_id,
            delta: award.delta,
            reason: normalize_reason(&award.reason),
            date,
        };

        let id = self.remote.submit(&draft).await.inspect_err(|e| {
            warn!(error = %e, student_id = %draft.student_id, "Submission failed");
        })?;

        let transaction = draft.into_transaction(id, &today());
        self.store.append_transaction(transaction.clone())?;

        info!(
            id = %transaction.id,
            student_id = %transaction.student_id,
            delta = transaction.delta,
            "Award recorded"
        );
        self.events.publish(LedgerEvent::TransactionAppended {
            transaction: transaction.clone(),
        });
        Ok(transaction)
    }

    /// Replace local transactions with the remote store's list.
    ///
    /// Any failure leaves the current transactions untouched. A list that
    /// references unknown students or groups is rejected whole and reported
    /// as [`SyncError::Remote`].
    pub async fn refresh(&mut self) -> Result<usize, SyncError> {
        let result = match self.remote.fetch_all().await {
            Ok(list) => {
                let count = list.len();
                self.store
                    .replace_transactions(list)
                    .map(|()| count)
                    .map_err(|e| SyncError::Remote(e.to_string()))
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(count) => {
                info!(count, "Ledger synced from remote store");
                self.events
                    .publish(LedgerEvent::TransactionsReplaced { count: *count });
            }
            Err(e) => {
                warn!(error = %e, kept = self.store.transactions().len(), "Sync failed, keeping local ledger");
            }
        }
        result
    }

    /// Look up a profile by access code.
    pub fn lookup(&self, code: &str) -> Option<Profile> {
        profile::find_by_code(&self.store, code).map(|s| profile::build_profile(&self.store, s))
    }

    /// Persist the last code used for a lookup.
    pub fn remember_code(&self, code: &str) {
        if let Err(e) = self.state.set(PROFILE_CODE_KEY, code.trim()) {
            warn!(error = %e, "Failed to remember profile code");
        }
    }

    pub fn remembered_code(&self) -> Option<String> {
        self.state
            .get(PROFILE_CODE_KEY)
            .filter(|code| !code.trim().is_empty())
    }

    /// The current in-memory dataset as pretty JSON.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.store.to_dataset())
    }
}

/// Accepts `YYYY-MM-DD`, or a timestamp starting with one.
fn parse_award_date(raw: &str) -> Result<String, AwardError> {
    let date = normalize_date(raw);
    match chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(_) => Ok(date),
        Err(_) => Err(AwardError::InvalidDate(raw.to_string())),
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::{dataset, tx};
    use crate::state::MemoryStateStore;
    use crate::sync::MockRemote;

    fn session(remote: Arc<MockRemote>) -> Scoreboard {
        Scoreboard::open(dataset(), remote, Arc::new(MemoryStateStore::new())).unwrap()
    }

    fn award(student_id: &str, delta: f64) -> Award {
        Award {
            student_id: student_id.to_string(),
            delta,
            reason: String::new(),
            date: None,
        }
    }

    #[tokio::test]
    async fn award_appends_with_remote_id_and_defaults() {
        let remote = Arc::new(MockRemote::new());
        let mut board = session(remote.clone());

        let tx = board.award(award("s2", 5.0)).await.unwrap();

        assert_eq!(tx.id, "remote-1");
        assert_eq!(tx.group_id, "g2");
        assert_eq!(tx.reason, "Adjustment");
        assert_eq!(tx.date, today());
        assert_eq!(board.group_totals()["g2"], 5.0);
        assert_eq!(remote.submitted()[0].date, None);
    }

    #[tokio::test]
    async fn zero_delta_is_rejected_before_submission() {
        let remote = Arc::new(MockRemote::new());
        let mut board = session(remote.clone());

        let err = board.award(award("s1", 0.0)).await.unwrap_err();
        assert!(matches!(err, ScoreboardError::Award(AwardError::ZeroDelta)));
        assert!(remote.submitted().is_empty());
    }

    #[tokio::test]
    async fn non_finite_delta_is_invalid_not_zero() {
        let remote = Arc::new(MockRemote::new());
        let mut board = session(remote.clone());

        let err = board.award(award("s1", f64::NAN)).await.unwrap_err();
        assert!(matches!(err, ScoreboardError::Award(AwardError::InvalidDelta(_))));
        let err = board.award(award("s1", f64::INFINITY)).await.unwrap_err();
        assert!(err.to_string().contains("finite"));
        assert!(remote.submitted().is_empty());
    }

    #[tokio::test]
    async fn non_iso_date_is_rejected_before_submission() {
        let remote = Arc::new(MockRemote::new());
        let mut board = session(remote.clone());

        for raw in ["9/3/2024", "2024-13-01", "yesterday"] {
            let err = board
                .award(Award {
                    date: Some(raw.to_string()),
                    ..award("s1", 2.0)
                })
                .await
                .unwrap_err();
            assert!(
                matches!(err, ScoreboardError::Award(AwardError::InvalidDate(ref d)) if d == raw),
                "{raw}"
            );
        }
        assert!(remote.submitted().is_empty());
        assert_eq!(board.store().transactions().len(), 1);
    }

    #[tokio::test]
    async fn timestamp_date_is_cut_to_calendar_day() {
        let remote = Arc::new(MockRemote::new());
        let mut board = session(remote.clone());

        let tx = board
            .award(Award {
                date: Some("2024-09-03T04:00:00Z".to_string()),
                ..award("s1", 2.0)
            })
            .await
            .unwrap();
        assert_eq!(tx.date, "2024-09-03");
        assert_eq!(remote.submitted()[0].date.as_deref(), Some("2024-09-03"));
    }

    #[tokio::test]
    async fn unknown_student_is_rejected() {
        let remote = Arc::new(MockRemote::new());
        let mut board = session(remote);

        let err = board.award(award("ghost", 3.0)).await.unwrap_err();
        assert!(matches!(err, ScoreboardError::Award(AwardError::UnknownStudent(_))));
    }

    #[tokio::test]
    async fn failed_submission_leaves_ledger_unchanged() {
        let remote = Arc::new(MockRemote::new());
        remote.queue_failure(SyncError::Remote("quota exceeded".to_string()));
        let mut board = session(remote);

        let err = board.award(award("s1", 5.0)).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(board.store().transactions().len(), 1);
    }

    #[tokio::test]
    async fn refresh_replaces_local_transactions() {
        let remote = Arc::new(MockRemote::with_transactions(vec![
            tx("r1", "s2", "g2", 8.0, "2024-09-04"),
            tx("r2", "s2", "g2", 1.0, "2024-09-05"),
        ]));
        let mut board = session(remote);
        let mut rx = board.subscribe();

        assert_eq!(board.refresh().await.unwrap(), 2);
        assert_eq!(board.group_totals()["g1"], 0.0);
        assert_eq!(board.group_totals()["g2"], 9.0);
        assert_eq!(
            rx.recv().await.unwrap(),
            LedgerEvent::TransactionsReplaced { count: 2 }
        );
    }

    #[tokio::test]
    async fn refresh_rejects_dangling_remote_records() {
        let remote = Arc::new(MockRemote::with_transactions(vec![tx(
            "r1", "s404", "g1", 8.0, "2024-09-04",
        )]));
        let mut board = session(remote);

        let err = board.refresh().await.unwrap_err();
        assert!(matches!(err, SyncError::Remote(_)));
        assert_eq!(board.store().transactions()[0].id, "t1");
    }

    #[tokio::test]
    async fn award_publishes_appended_event() {
        let remote = Arc::new(MockRemote::new());
        let mut board = session(remote);
        let mut rx = board.subscribe();

        let tx = board.award(award("s1", 2.0)).await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            LedgerEvent::TransactionAppended { transaction: tx }
        );
    }

    #[test]
    fn remembered_code_round_trips() {
        let board = session(Arc::new(MockRemote::new()));
        assert!(board.remembered_code().is_none());

        board.remember_code(" abc1 ");
        assert_eq!(board.remembered_code(), Some("abc1".to_string()));
    }

    #[test]
    fn export_json_round_trips_current_state() {
        let board = session(Arc::new(MockRemote::new()));
        let json = board.export_json().unwrap();
        assert_eq!(Dataset::from_json(&json).unwrap(), board.store().to_dataset());
    }
}
