//! Student profiles looked up by access code

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::student_total;
use crate::ledger::LedgerStore;
use crate::model::{Group, Points, Powerup, Student, Transaction};
use crate::tiers::{TierStatus, resolve};

/// Everything shown on a student's own page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub student: Student,
    pub group: Option<Group>,
    pub total: Points,
    pub tiers: TierStatus,
    /// Held power-ups; ids missing from the catalogue are labelled by id
    pub powerups: Vec<Powerup>,
    /// Newest first
    pub history: Vec<Transaction>,
}

/// Find the student whose code matches `code`, ignoring case.
///
/// Surrounding whitespace in the input is ignored and an empty code never
/// matches. No match is a normal outcome.
pub fn find_by_code<'a>(store: &'a LedgerStore, code: &str) -> Option<&'a Student> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    let wanted = code.to_lowercase();
    store
        .students()
        .iter()
        .find(|s| s.code.to_lowercase() == wanted)
}

/// Assemble the profile for `student`.
pub fn build_profile(store: &LedgerStore, student: &Student) -> Profile {
    let total = student_total(store, &student.id);

    let mut history: Vec<Transaction> = store
        .transactions()
        .iter()
        .filter(|tx| tx.student_id == student.id)
        .cloned()
        .collect();
    // Undated or unparseable entries go last; sort_by is stable so ties keep ledger order
    history.sort_by(|a, b| history_key(b).cmp(&history_key(a)));

    let powerups = student
        .powerups
        .iter()
        .map(|id| {
            store.powerup(id).cloned().unwrap_or_else(|| Powerup {
                id: id.clone(),
                label: id.clone(),
            })
        })
        .collect();

    Profile {
        student: student.clone(),
        group: store.group(&student.group_id).cloned(),
        total,
        tiers: resolve(total, store.tiers()),
        powerups,
        history,
    }
}

/// `None` orders below every real date.
fn history_key(tx: &Transaction) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(tx.date.trim(), "%Y-%m-%d").ok()
}
