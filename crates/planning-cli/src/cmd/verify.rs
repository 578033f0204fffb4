use crate::output::print_outcome;
use clap::Subcommand;
use planning_core::{completeness, validate};
use std::path::Path;

#[derive(Subcommand)]
pub enum VerifySubcommand {
    /// Check a PLAN.md for required frontmatter and well-formed tasks
    PlanStructure {
        /// Plan file, relative to the project root
        file: String,
    },
    /// Check that every plan in a phase has a summary
    PhaseCompleteness {
        /// Phase number (e.g. 1, 01, 2.1, "Phase 3")
        phase: String,
    },
}

pub fn run(root: &Path, subcmd: VerifySubcommand) -> anyhow::Result<()> {
    match subcmd {
        VerifySubcommand::PlanStructure { file } => print_outcome(
            validate::verify_plan_file(root, &file),
            "failed to verify plan structure",
        ),
        VerifySubcommand::PhaseCompleteness { phase } => print_outcome(
            completeness::check_phase_completeness(root, &phase),
            "failed to check phase completeness",
        ),
    }
}
