//! scoreboard-core: ledger, rankings, milestones and remote sync for a
//! classroom points scoreboard
//!
//! This crate provides:
//!
//! - **Ledger** - [`LedgerStore`] holding groups, students, reward tiers and the
//!   append-only transaction list
//! - **Aggregation and ranking** - [`aggregate`] totals and filtered
//!   [`ranking`] leaderboards
//! - **Reward tiers** - [`tiers::resolve`] splits tiers into earned and locked
//! - **Milestones** - [`MilestoneDetector`] celebrates each band crossing once,
//!   using a snapshot kept in a [`StateStore`]
//! - **Remote sync** - [`RemoteLedger`] over HTTP ([`HttpRemote`])
//! - **Profiles** - access-code lookup via [`profile`]
//! - **Session** - [`Scoreboard`], the context object tying it all together
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use scoreboard_core::{Dataset, FileStateStore, HttpRemote, Scoreboard};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Dataset::from_path("data/classroom.json".as_ref())?;
//!     let remote = Arc::new(HttpRemote::new(Some("https://script.example.com/exec".into())));
//!     let mut board = Scoreboard::open(dataset, remote, Arc::new(FileStateStore::open_default()))?;
//!
//!     // Remote store is authoritative; a failure keeps the bundled ledger
//!     let _ = board.refresh().await;
//!
//!     for entry in board.group_board(&[]) {
//!         println!("{}. {} ({})", entry.rank, entry.entity.name, entry.points);
//!     }
//!     if board.check_milestones().is_some() {
//!         println!("Milestone!");
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod error;
pub mod events;
pub mod ledger;
pub mod milestone;
pub mod model;
pub mod profile;
pub mod ranking;
pub mod session;
pub mod state;
pub mod sync;
pub mod tiers;

// Re-export key types for convenience
pub use aggregate::Totals;
pub use error::{AwardError, DataError, ScoreboardError, StateError, SyncError};
pub use events::{LedgerEvent, LedgerEvents};
pub use ledger::LedgerStore;
pub use milestone::{Crossing, MILESTONE_INTERVAL, Milestone, MilestoneDetector};
pub use model::{Dataset, Group, Points, Powerup, RewardTier, Student, Transaction, TransactionId};
pub use profile::Profile;
pub use ranking::{Filter, RankedEntry, Rankable};
pub use session::{Award, Scoreboard};
pub use state::{FileStateStore, MemoryStateStore, StateStore};
pub use sync::{HttpRemote, MockRemote, RemoteLedger, TransactionDraft};
pub use tiers::TierStatus;
