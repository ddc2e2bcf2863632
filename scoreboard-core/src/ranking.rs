//! Leaderboards
//!
//! Filters are applied first (all must match), points are attached from a
//! totals map, then entries are stable-sorted by points descending. Ranks are
//! 1-based positions in the filtered sequence, not in the whole population.

use std::cmp::Ordering;

use serde::Serialize;

use crate::aggregate::Totals;
use crate::model::{Group, Points, Student};

/// Something that can appear on a leaderboard
pub trait Rankable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Group the entity belongs to (a group belongs to itself)
    fn group_id(&self) -> &str;
    /// Secondary grouping tag, if any
    fn cohort(&self) -> Option<&str>;
}

impl Rankable for Group {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn group_id(&self) -> &str {
        &self.id
    }

    fn cohort(&self) -> Option<&str> {
        Some(self.hour.as_str()).filter(|h| !h.is_empty())
    }
}

impl Rankable for Student {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn group_id(&self) -> &str {
        &self.group_id
    }

    fn cohort(&self) -> Option<&str> {
        self.class_id.as_deref()
    }
}

/// Leaderboard filter predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Entity belongs to this group
    Group(String),
    /// Entity carries this cohort tag
    Cohort(String),
    /// Case-insensitive substring of the display name
    NameContains(String),
}

impl Filter {
    pub fn matches<T: Rankable>(&self, entity: &T) -> bool {
        match self {
            Filter::Group(id) => entity.group_id() == id,
            Filter::Cohort(tag) => entity.cohort() == Some(tag.as_str()),
            Filter::NameContains(needle) => entity
                .name()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// One row of a leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<'a, T> {
    /// 1-based position in the filtered board
    pub rank: usize,
    pub points: Points,
    pub entity: &'a T,
}

/// Build a leaderboard from `entities`.
///
/// Entities missing from `totals` count as zero. Equal points keep their
/// input order.
pub fn rank<'a, T: Rankable>(
    entities: &'a [T],
    totals: &Totals,
    filters: &[Filter],
) -> Vec<RankedEntry<'a, T>> {
    let mut rows: Vec<(Points, &'a T)> = entities
        .iter()
        .filter(|entity| filters.iter().all(|f| f.matches(*entity)))
        .map(|entity| (totals.get(entity.id()).copied().unwrap_or(0.0), entity))
        .collect();

    rows.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    rows.into_iter()
        .enumerate()
        .map(|(i, (points, entity))| RankedEntry {
            rank: i + 1,
            points,
            entity,
        })
        .collect()
}
