use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod config;
mod session;

#[derive(Parser)]
#[command(name = "scoreboard", about = "Classroom points ledger and leaderboards")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Dataset file (overrides data.dataset from config)
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Skip the remote store and use the bundled ledger only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the group leaderboard
    Groups(commands::board::GroupsArgs),
    /// Show the student leaderboard
    Students(commands::board::StudentsArgs),
    /// Look up a student profile by access code
    Profile(commands::profile::ProfileArgs),
    /// Give or take points (teacher only)
    Award(commands::award::AwardArgs),
    /// Pull the full ledger from the remote store
    Sync,
    /// Dump the current dataset as JSON
    Export(commands::export::ExportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Groups(args) => commands::board::run_groups(args, &cli.global).await,
        Commands::Students(args) => commands::board::run_students(args, &cli.global).await,
        Commands::Profile(args) => commands::profile::run(args, &cli.global).await,
        Commands::Award(args) => commands::award::run(args, &cli.global).await,
        Commands::Sync => commands::sync::run(&cli.global).await,
        Commands::Export(args) => commands::export::run(args, &cli.global).await,
        Commands::Config(args) => commands::config::run(args, &cli.global),
    }
}
