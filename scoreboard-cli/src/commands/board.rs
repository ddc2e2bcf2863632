//! Group and student leaderboards.
//!
//! Both boards are ranked by total points with the reward tiers each entry
//! has earned. Showing the group board also runs the milestone check.

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use scoreboard_core::{Filter, Milestone, Points, RankedEntry, Rankable, Scoreboard};

use crate::GlobalArgs;

/// Group leaderboard arguments.
#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Only show groups from this class hour
    #[arg(long)]
    pub hour: Option<String>,
}

/// Student leaderboard arguments.
#[derive(Args, Debug)]
pub struct StudentsArgs {
    /// Only show members of this group id
    #[arg(long)]
    pub group: Option<String>,

    /// Only show students in this class
    #[arg(long)]
    pub class: Option<String>,

    /// Case-insensitive name search
    #[arg(long, short)]
    pub search: Option<String>,
}

impl GroupsArgs {
    fn filters(&self) -> Vec<Filter> {
        self.hour.iter().cloned().map(Filter::Cohort).collect()
    }
}

impl StudentsArgs {
    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if let Some(group) = &self.group {
            filters.push(Filter::Group(group.clone()));
        }
        if let Some(class) = &self.class {
            filters.push(Filter::Cohort(class.clone()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            filters.push(Filter::NameContains(search.to_string()));
        }
        filters
    }
}

/// Run the group leaderboard command.
pub async fn run_groups(args: GroupsArgs, global: &GlobalArgs) -> Result<()> {
    let board = crate::session::open(global).await?;
    let entries = board.group_board(&args.filters());

    if entries.is_empty() {
        println!("No groups match the specified filters.");
    } else {
        println!("{}", leaderboard_table(&board, &entries, "Group"));
    }

    if let Some(milestone) = board.check_milestones() {
        celebrate(&board, &milestone);
    }
    Ok(())
}

/// Run the student leaderboard command.
pub async fn run_students(args: StudentsArgs, global: &GlobalArgs) -> Result<()> {
    let board = crate::session::open(global).await?;
    let entries = board.student_board(&args.filters());

    if entries.is_empty() {
        println!("No students match the specified filters.");
        return Ok(());
    }

    println!("{}", leaderboard_table(&board, &entries, "Student"));
    Ok(())
}

fn leaderboard_table<T: Rankable>(
    board: &Scoreboard,
    entries: &[RankedEntry<'_, T>],
    label: &str,
) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new(label).fg(Color::Cyan),
        Cell::new("Points").fg(Color::Cyan),
        Cell::new("Rewards").fg(Color::Cyan),
    ]);

    for entry in entries {
        let tiers = board.tiers_for(entry.points);
        let rewards = tiers
            .earned
            .iter()
            .map(|tier| tier.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(entry.entity.name()),
            Cell::new(format_points(entry.points)),
            Cell::new(rewards),
        ]);
    }
    table
}

pub(crate) fn celebrate(board: &Scoreboard, milestone: &Milestone) {
    println!();
    for crossing in &milestone.crossings {
        let name = board
            .store()
            .group(&crossing.group_id)
            .map(|g| g.name.as_str())
            .unwrap_or(crossing.group_id.as_str());
        println!(
            "Milestone! {} reached {} points ({} -> {})",
            name,
            format_points(crossing.band as Points * board.milestone_interval()),
            format_points(crossing.previous),
            format_points(crossing.current),
        );
    }
}

/// Render a point total without a trailing `.0` for whole numbers.
pub(crate) fn format_points(points: Points) -> String {
    if points.fract() == 0.0 && points.abs() < 1e15 {
        format!("{}", points as i64)
    } else {
        format!("{:.1}", points)
    }
}
