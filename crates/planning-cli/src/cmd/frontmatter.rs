use crate::output::print_outcome;
use clap::Subcommand;
use planning_core::frontmatter;
use std::path::Path;

#[derive(Subcommand)]
pub enum FrontmatterSubcommand {
    /// Print a document's frontmatter as JSON
    Get {
        /// Document path, relative to the project root
        file: String,
        /// Dotted field path (e.g. must_haves.truths)
        #[arg(long)]
        field: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: FrontmatterSubcommand) -> anyhow::Result<()> {
    match subcmd {
        FrontmatterSubcommand::Get { file, field } => print_outcome(
            frontmatter::frontmatter_json(root, &file, field.as_deref()),
            "failed to read frontmatter",
        ),
    }
}
