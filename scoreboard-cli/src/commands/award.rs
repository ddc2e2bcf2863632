//! Teacher point adjustments

use anyhow::{Result, bail};
use clap::Args;
use scoreboard_core::Award;

use super::board::{celebrate, format_points};
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct AwardArgs {
    /// Student id
    #[arg(long)]
    pub student: String,

    /// Points to add; negative to deduct
    #[arg(long, allow_hyphen_values = true)]
    pub points: f64,

    /// Reason shown in the student's history
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Teacher passcode, when the dataset sets one
    #[arg(long, env = "SCOREBOARD_PASSCODE", hide_env_values = true)]
    pub passcode: Option<String>,
}

pub async fn run(args: AwardArgs, global: &GlobalArgs) -> Result<()> {
    let mut board = crate::session::open(global).await?;

    let passcode = args.passcode.as_deref().unwrap_or("");
    if !board.store().check_passcode(passcode) {
        bail!("Incorrect teacher passcode");
    }

    // Totals before the award become the baseline for this award's crossing
    if let Some(milestone) = board.check_milestones() {
        celebrate(&board, &milestone);
    }

    let tx = board
        .award(Award {
            student_id: args.student,
            delta: args.points,
            reason: args.reason,
            date: args.date,
        })
        .await?;

    let name = board
        .store()
        .student(&tx.student_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| tx.student_id.clone());
    let sign = if tx.delta > 0.0 { "+" } else { "" };
    println!(
        "Recorded {}{} for {} ({}, {}) as {}",
        sign,
        format_points(tx.delta),
        name,
        tx.reason,
        tx.date,
        tx.id
    );

    if let Some(milestone) = board.check_milestones() {
        celebrate(&board, &milestone);
    }
    Ok(())
}
