//! Milestone detection against a persisted snapshot
//!
//! Group totals are split into fixed-size bands. A group crosses a milestone
//! when its band goes up between the last persisted snapshot and now, and it
//! has reached at least the first band. The snapshot is overwritten after
//! every evaluation so each band is celebrated once, even across reloads.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::Totals;
use crate::model::Points;
use crate::state::{MILESTONE_TOTALS_KEY, StateStore};

/// Default band width
pub const MILESTONE_INTERVAL: Points = 25.0;

/// A group that moved into a higher band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crossing {
    pub group_id: String,
    pub previous: Points,
    pub current: Points,
    /// Band reached, `floor(current / interval)`
    pub band: i64,
}

/// Result of an evaluation pass with at least one crossing.
///
/// The caller celebrates once per `Milestone`, however many groups crossed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub crossings: Vec<Crossing>,
}

impl Milestone {
    pub fn group_ids(&self) -> Vec<&str> {
        self.crossings.iter().map(|c| c.group_id.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilestoneDetector {
    interval: Points,
}

impl Default for MilestoneDetector {
    fn default() -> Self {
        Self {
            interval: MILESTONE_INTERVAL,
        }
    }
}

impl MilestoneDetector {
    /// Create a detector with a custom band width.
    ///
    /// Non-positive or non-finite widths fall back to [`MILESTONE_INTERVAL`].
    pub fn new(interval: Points) -> Self {
        if interval.is_finite() && interval > 0.0 {
            Self { interval }
        } else {
            warn!(interval, "Invalid milestone interval, using default");
            Self::default()
        }
    }

    pub fn interval(&self) -> Points {
        self.interval
    }

    fn band(&self, total: Points) -> i64 {
        (total / self.interval).floor() as i64
    }

    /// Compare current totals with a previous snapshot.
    ///
    /// Groups absent from `previous` have no baseline and never cross.
    pub fn evaluate(&self, previous: &Totals, current: &Totals) -> Option<Milestone> {
        let crossings: Vec<Crossing> = current
            .iter()
            .filter_map(|(group_id, &now)| {
                let &before = previous.get(group_id)?;
                let band = self.band(now);
                (band > self.band(before) && now >= self.interval).then(|| Crossing {
                    group_id: group_id.clone(),
                    previous: before,
                    current: now,
                    band,
                })
            })
            .collect();

        if crossings.is_empty() {
            None
        } else {
            Some(Milestone { crossings })
        }
    }

    /// Evaluate against the persisted snapshot, then overwrite it with `current`.
    ///
    /// An absent or unreadable snapshot counts as empty. A failed write is
    /// logged; the result of this pass still stands.
    pub fn check(&self, state: &dyn StateStore, current: &Totals) -> Option<Milestone> {
        let previous = load_snapshot(state).unwrap_or_default();
        let milestone = self.evaluate(&previous, current);

        if let Err(e) = save_snapshot(state, current) {
            warn!(error = %e, "Failed to persist milestone snapshot");
        }

        debug!(
            groups = current.len(),
            crossed = milestone.as_ref().map_or(0, |m| m.crossings.len()),
            "Milestone pass complete"
        );
        milestone
    }
}

/// Read the persisted snapshot.
///
/// Returns `None` when the entry is missing or is not a JSON object. Entries
/// that are not numbers (or numeric strings) are dropped.
pub fn load_snapshot(state: &dyn StateStore) -> Option<Totals> {
    let raw = state.get(MILESTONE_TOTALS_KEY)?;
    let parsed: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable milestone snapshot");
            return None;
        }
    };

    Some(
        parsed
            .into_iter()
            .filter_map(|(id, value)| {
                let total = match value {
                    serde_json::Value::Number(n) => n.as_f64(),
                    serde_json::Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                }?;
                Some((id, total))
            })
            .collect(),
    )
}

/// Overwrite the persisted snapshot.
pub fn save_snapshot(
    state: &dyn StateStore,
    totals: &Totals,
) -> Result<(), crate::error::StateError> {
    let json = serde_json::to_string(totals)?;
    state.set(MILESTONE_TOTALS_KEY, &json)
}
