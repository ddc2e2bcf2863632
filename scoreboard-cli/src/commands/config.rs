//! Inspect the merged configuration and where the scoreboard reads and writes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use scoreboard_core::FileStateStore;

use crate::GlobalArgs;
use crate::config::{ConfigLoader, ScoreboardConfig};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML (user layer, then project layer)
    Show,
    /// List config layers, the dataset, the state file and the remote endpoint
    Path,
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    match args.command {
        ConfigCommands::Show => print!("{}", toml::to_string_pretty(&config)?),
        ConfigCommands::Path => {
            let layers = ConfigLoader::user_config_path()
                .into_iter()
                .chain([ConfigLoader::project_config_path()]);
            for (label, value) in locations(&config, global, layers) {
                println!("{label:<15} {value}");
            }
        }
    }
    Ok(())
}

/// Label/value rows for `config path`, layers first in merge order.
fn locations(
    config: &ScoreboardConfig,
    global: &GlobalArgs,
    layers: impl IntoIterator<Item = PathBuf>,
) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = layers
        .into_iter()
        .enumerate()
        .map(|(i, path)| (format!("Layer {}:", i + 1), with_presence(&path)))
        .collect();

    let dataset = global.dataset.as_ref().unwrap_or(&config.data.dataset);
    let state_dir = config
        .data
        .state_dir
        .clone()
        .unwrap_or_else(scoreboard_paths::data_dir);
    let endpoint = if global.offline {
        "(offline)".to_string()
    } else {
        config
            .remote
            .endpoint
            .clone()
            .unwrap_or_else(|| "(not configured)".to_string())
    };

    rows.push(("Dataset:".to_string(), with_presence(dataset)));
    rows.push(("State file:".to_string(), with_presence(&FileStateStore::file_in(&state_dir))));
    rows.push(("Remote:".to_string(), endpoint));
    rows
}

fn with_presence(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (missing)", path.display())
    }
}
