//! Student profile lookup by access code

use anyhow::{Result, bail};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use scoreboard_core::{Profile, Transaction};

use super::board::format_points;
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Access code (defaults to the last code looked up)
    pub code: Option<String>,
}

pub async fn run(args: ProfileArgs, global: &GlobalArgs) -> Result<()> {
    let board = crate::session::open(global).await?;

    let Some(code) = args.code.or_else(|| board.remembered_code()) else {
        bail!("No access code given and none remembered; run `scoreboard profile <CODE>`");
    };

    let Some(profile) = board.lookup(&code) else {
        println!("No student found for code '{}'.", code.trim());
        return Ok(());
    };
    board.remember_code(&code);

    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &Profile) {
    let group = profile
        .group
        .as_ref()
        .map(|g| g.name.as_str())
        .unwrap_or("(no group)");

    println!("{} ({})", profile.student.name, group);
    println!("Level {}", profile.student.level);
    println!("Total: {} points", format_points(profile.total));

    if !profile.tiers.earned.is_empty() {
        let earned: Vec<&str> = profile.tiers.earned.iter().map(|t| t.name.as_str()).collect();
        println!("Rewards: {}", earned.join(", "));
    }
    if let (Some(next), Some(needed)) = (
        profile.tiers.next_locked(),
        profile.tiers.points_to_next(profile.total),
    ) {
        println!("Next: {} in {} points", next.name, format_points(needed));
    }

    if !profile.powerups.is_empty() {
        let labels: Vec<&str> = profile.powerups.iter().map(|p| p.label.as_str()).collect();
        println!("Power-ups: {}", labels.join(", "));
    }

    println!();
    if profile.history.is_empty() {
        println!("No points history yet.");
    } else {
        println!("{}", history_table(&profile.history));
    }
}

fn history_table(history: &[Transaction]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Points").fg(Color::Cyan),
        Cell::new("Reason").fg(Color::Cyan),
    ]);

    for tx in history {
        let points = if tx.delta > 0.0 {
            Cell::new(format!("+{}", format_points(tx.delta))).fg(Color::Green)
        } else {
            Cell::new(format_points(tx.delta)).fg(Color::Red)
        };
        table.add_row(vec![Cell::new(&tx.date), points, Cell::new(&tx.reason)]);
    }
    table
}
