use crate::output::print_outcome;
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use planning_core::config::Config;
use planning_core::milestone::{complete_milestone, CompleteOptions};
use std::path::Path;

#[derive(Subcommand)]
pub enum MilestoneSubcommand {
    /// Archive ROADMAP/REQUIREMENTS, record the milestone, and update STATE.md
    Complete {
        /// Milestone version (e.g. v1.0)
        #[arg(id = "milestone_version", value_name = "VERSION")]
        version: String,
        /// Milestone name; multiple words are joined with spaces
        #[arg(long, required = true, num_args = 1..)]
        name: Vec<String>,
        /// Also move .planning/phases/ into the milestone archive
        #[arg(long)]
        archive_phases: bool,
        /// Shipping date (YYYY-MM-DD); defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(root: &Path, subcmd: MilestoneSubcommand) -> anyhow::Result<()> {
    match subcmd {
        MilestoneSubcommand::Complete {
            version,
            name,
            archive_phases,
            date,
        } => complete(root, version, name.join(" "), archive_phases, date),
    }
}

fn complete(
    root: &Path,
    version: String,
    name: String,
    archive_phases: bool,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let opts = CompleteOptions {
        version,
        name,
        archive_phases: archive_phases || config.milestone.archive_phases,
        date: date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
    };
    print_outcome(
        complete_milestone(root, &opts),
        &format!("failed to complete milestone {}", opts.version),
    )
}
