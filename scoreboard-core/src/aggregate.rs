//! Point totals derived from the ledger
//!
//! Totals are always recomputed from every transaction the store holds.
//! Every known entity starts at zero so empty groups and students still
//! appear on the boards.

use std::collections::BTreeMap;

use crate::ledger::LedgerStore;
use crate::model::Points;

/// Aggregated totals keyed by entity id
pub type Totals = BTreeMap<String, Points>;

/// Sum transaction deltas per group.
pub fn totals_by_group(store: &LedgerStore) -> Totals {
    let mut totals: Totals = store.groups().iter().map(|g| (g.id.clone(), 0.0)).collect();
    for tx in store.transactions() {
        if let Some(total) = totals.get_mut(&tx.group_id) {
            *total += tx.delta;
        }
    }
    totals
}

/// Sum transaction deltas per student.
pub fn totals_by_student(store: &LedgerStore) -> Totals {
    let mut totals: Totals = store
        .students()
        .iter()
        .map(|s| (s.id.clone(), 0.0))
        .collect();
    for tx in store.transactions() {
        if let Some(total) = totals.get_mut(&tx.student_id) {
            *total += tx.delta;
        }
    }
    totals
}

/// Total for a single student.
pub fn student_total(store: &LedgerStore, student_id: &str) -> Points {
    store
        .transactions()
        .iter()
        .filter(|tx| tx.student_id == student_id)
        .map(|tx| tx.delta)
        .sum()
}
