//! Error types for scoreboard-core

use thiserror::Error;

/// Top-level error type for scoreboard-core
#[derive(Error, Debug)]
pub enum ScoreboardError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Award rejected: {0}")]
    Award(#[from] AwardError),
}

/// Errors raised while loading or mutating the ledger dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{record} references unknown {field} '{id}'")]
    DanglingReference {
        record: String,
        field: &'static str,
        id: String,
    },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the remote transaction store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Remote endpoint is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote store error: {0}")]
    Remote(String),
}

/// Reasons an award is refused before it reaches the remote store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AwardError {
    #[error("Point change must not be zero")]
    ZeroDelta,

    #[error("Point change must be a finite number, got {0}")]
    InvalidDelta(f64),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown student: {0}")]
    UnknownStudent(String),
}

/// Errors writing persisted session state
#[derive(Error, Debug)]
pub enum StateError {
    #[error("State storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
