use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use planning_core::{config::Config, consistency};
use std::path::Path;

#[derive(Subcommand)]
pub enum ValidateSubcommand {
    /// Compare ROADMAP.md phases with the directories on disk
    Consistency,
}

pub fn run(root: &Path, subcmd: ValidateSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ValidateSubcommand::Consistency => {
            let config = Config::load(root).context("failed to load config")?;
            let report = consistency::check_consistency(root, &config.consistency)
                .context("failed to check consistency")?;
            print_json(&report)
        }
    }
}
