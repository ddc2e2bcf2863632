//! In-memory ledger store
//!
//! Groups, students, reward tiers and the power-up catalogue are fixed for
//! the lifetime of a loaded dataset. The transaction collection is the only
//! mutable part, and only [`LedgerStore::append_transaction`] and
//! [`LedgerStore::replace_transactions`] change it. No aggregates are cached;
//! consumers recompute derived views after every mutation.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::DataError;
use crate::model::{Dataset, Group, Powerup, RewardTier, Student, Transaction};

/// Single owner of the loaded dataset
#[derive(Debug, Clone)]
pub struct LedgerStore {
    groups: Vec<Group>,
    students: Vec<Student>,
    transactions: Vec<Transaction>,
    tiers: Vec<RewardTier>,
    powerups: Vec<Powerup>,
    teacher_passcode: Option<String>,
    group_index: HashMap<String, usize>,
    student_index: HashMap<String, usize>,
}

impl LedgerStore {
    /// Load and validate a dataset.
    ///
    /// Fails with [`DataError::DanglingReference`] when a student names a
    /// missing group or a transaction names a missing student or group, and
    /// with [`DataError::DuplicateId`] when two groups or two students share an id.
    pub fn load_dataset(raw: Dataset) -> Result<Self, DataError> {
        let group_index = index_by_id("group", raw.groups.iter().map(|g| g.id.as_str()))?;
        let student_index = index_by_id("student", raw.students.iter().map(|s| s.id.as_str()))?;

        for student in &raw.students {
            if !group_index.contains_key(&student.group_id) {
                return Err(DataError::DanglingReference {
                    record: format!("student {}", student.id),
                    field: "groupId",
                    id: student.group_id.clone(),
                });
            }
        }

        let store = Self {
            groups: raw.groups,
            students: raw.students,
            transactions: Vec::new(),
            tiers: raw.pets,
            powerups: raw.powerups,
            teacher_passcode: raw.teacher_passcode,
            group_index,
            student_index,
        };
        store.check_references(&raw.transactions)?;

        debug!(
            groups = store.groups.len(),
            students = store.students.len(),
            transactions = raw.transactions.len(),
            "Dataset loaded"
        );

        Ok(Self {
            transactions: raw.transactions,
            ..store
        })
    }

    /// Append a transaction after a successful remote write.
    pub fn append_transaction(&mut self, tx: Transaction) -> Result<(), DataError> {
        self.check_reference(&tx)?;
        self.transactions.push(tx);
        Ok(())
    }

    /// Swap in the authoritative transaction list from the remote store.
    ///
    /// Every record is checked before anything is replaced, so a rejected
    /// list leaves the current transactions untouched.
    pub fn replace_transactions(&mut self, list: Vec<Transaction>) -> Result<(), DataError> {
        self.check_references(&list)?;
        self.transactions = list;
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Reward tiers in dataset order
    pub fn tiers(&self) -> &[RewardTier] {
        &self.tiers
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.group_index.get(id).map(|&i| &self.groups[i])
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.student_index.get(id).map(|&i| &self.students[i])
    }

    pub fn powerup(&self, id: &str) -> Option<&Powerup> {
        self.powerups.iter().find(|p| p.id == id)
    }

    /// Plain equality gate for teacher-only actions.
    ///
    /// A dataset without a passcode leaves the gate open.
    pub fn check_passcode(&self, input: &str) -> bool {
        match &self.teacher_passcode {
            Some(passcode) => passcode == input,
            None => true,
        }
    }

    /// Whether the dataset defines a teacher passcode
    pub fn has_passcode(&self) -> bool {
        self.teacher_passcode.is_some()
    }

    /// Snapshot of the current in-memory state, for export.
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            groups: self.groups.clone(),
            students: self.students.clone(),
            transactions: self.transactions.clone(),
            pets: self.tiers.clone(),
            powerups: self.powerups.clone(),
            teacher_passcode: self.teacher_passcode.clone(),
        }
    }

    fn check_references(&self, list: &[Transaction]) -> Result<(), DataError> {
        list.iter().try_for_each(|tx| self.check_reference(tx))
    }

    fn check_reference(&self, tx: &Transaction) -> Result<(), DataError> {
        if !self.student_index.contains_key(&tx.student_id) {
            return Err(DataError::DanglingReference {
                record: format!("transaction {}", tx.id),
                field: "studentId",
                id: tx.student_id.clone(),
            });
        }
        if !self.group_index.contains_key(&tx.group_id) {
            return Err(DataError::DanglingReference {
                record: format!("transaction {}", tx.id),
                field: "groupId",
                id: tx.group_id.clone(),
            });
        }
        Ok(())
    }
}

fn index_by_id<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>, DataError> {
    let mut seen = HashSet::new();
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if !seen.insert(id) {
            return Err(DataError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
        index.insert(id.to_string(), i);
    }
    Ok(index)
}
