use crate::output::{print_json, print_outcome};
use anyhow::Context;
use clap::Subcommand;
use planning_core::requirements;
use std::path::Path;

#[derive(Subcommand)]
pub enum RequirementsSubcommand {
    /// Tick requirement ids in both the checklist and the traceability table
    MarkComplete {
        /// Requirement ids (space or comma separated, brackets allowed)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Count checked/unchecked requirements and list drifted ids
    Status,
}

pub fn run(root: &Path, subcmd: RequirementsSubcommand) -> anyhow::Result<()> {
    match subcmd {
        RequirementsSubcommand::MarkComplete { ids } => mark_complete(root, &ids),
        RequirementsSubcommand::Status => status(root),
    }
}

fn mark_complete(root: &Path, raw: &[String]) -> anyhow::Result<()> {
    let ids = requirements::parse_ids(&raw.join(" "));
    print_outcome(
        requirements::mark_complete(root, &ids),
        "failed to update REQUIREMENTS.md",
    )
}

fn status(root: &Path) -> anyhow::Result<()> {
    let status = requirements::ledger_status(root).context("failed to read REQUIREMENTS.md")?;
    match status {
        Some(s) => print_json(&s),
        None => print_json(&serde_json::json!({ "error": "REQUIREMENTS.md not found" })),
    }
}
