//! Full dataset export

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: ExportArgs, global: &GlobalArgs) -> Result<()> {
    let board = crate::session::open(global).await?;
    let json = board.export_json()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported dataset to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
