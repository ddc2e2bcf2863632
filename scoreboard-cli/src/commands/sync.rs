//! Manual pull from the remote store

use anyhow::{Result, bail};

use super::board::celebrate;
use crate::GlobalArgs;
use crate::config::ConfigLoader;

pub async fn run(global: &GlobalArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let (mut board, configured) = crate::session::open_unsynced(&config, global)?;
    if !configured {
        bail!("No remote endpoint configured (set remote.endpoint in config.toml)");
    }

    let count = board.refresh().await?;
    println!("Synced {} transactions from the remote store", count);

    if let Some(milestone) = board.check_milestones() {
        celebrate(&board, &milestone);
    }
    Ok(())
}
