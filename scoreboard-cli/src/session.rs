//! Opening a scoreboard session from configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use scoreboard_core::{Dataset, FileStateStore, HttpRemote, MilestoneDetector, Scoreboard};
use tracing::debug;

use crate::GlobalArgs;
use crate::config::{ConfigLoader, ScoreboardConfig};

/// Load config and the dataset, then pull the remote ledger once.
///
/// A failed pull is reported and the session continues on the bundled ledger.
pub async fn open(global: &GlobalArgs) -> Result<Scoreboard> {
    let config = ConfigLoader::load()?;
    open_with_config(&config, global).await
}

pub async fn open_with_config(config: &ScoreboardConfig, global: &GlobalArgs) -> Result<Scoreboard> {
    let (mut board, configured) = open_unsynced(config, global)?;

    if configured && let Err(e) = board.refresh().await {
        eprintln!("Warning: could not sync with the remote store ({e}); showing the bundled ledger");
    }

    Ok(board)
}

/// Load the session without pulling from the remote store.
///
/// Also reports whether a remote endpoint is in use.
pub fn open_unsynced(config: &ScoreboardConfig, global: &GlobalArgs) -> Result<(Scoreboard, bool)> {
    let dataset_path = dataset_path(config, global);
    let dataset = Dataset::from_path(&dataset_path)
        .with_context(|| format!("Failed to load dataset {}", dataset_path.display()))?;

    let endpoint = if global.offline {
        None
    } else {
        config.remote.endpoint.clone()
    };
    let remote = Arc::new(HttpRemote::with_timeout(
        endpoint,
        Duration::from_secs(config.remote.timeout_secs),
    ));
    let configured = remote.is_configured();

    let state = match &config.data.state_dir {
        Some(dir) => FileStateStore::open(dir),
        None => FileStateStore::open_default(),
    };
    debug!(path = %state.path().display(), "Using state file");

    let board = Scoreboard::open(dataset, remote, Arc::new(state))
        .with_context(|| format!("Invalid dataset {}", dataset_path.display()))?
        .with_detector(MilestoneDetector::new(config.milestone.interval));

    Ok((board, configured))
}

fn dataset_path(config: &ScoreboardConfig, global: &GlobalArgs) -> PathBuf {
    global
        .dataset
        .clone()
        .unwrap_or_else(|| config.data.dataset.clone())
}
