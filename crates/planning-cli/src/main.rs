mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, frontmatter::FrontmatterSubcommand,
    milestone::MilestoneSubcommand, requirements::RequirementsSubcommand,
    validate::ValidateSubcommand, verify::VerifySubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "planning",
    about = "Maintain .planning/ roadmap, requirements, and milestone documents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .planning/ or .git/)
    #[arg(long, global = true, env = "PLANNING_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update the requirement ledger
    Requirements {
        #[command(subcommand)]
        subcommand: RequirementsSubcommand,
    },

    /// Check a single plan or phase
    Verify {
        #[command(subcommand)]
        subcommand: VerifySubcommand,
    },

    /// Cross-check ROADMAP.md against the phases tree
    Validate {
        #[command(subcommand)]
        subcommand: ValidateSubcommand,
    },

    /// Archive a finished milestone
    Milestone {
        #[command(subcommand)]
        subcommand: MilestoneSubcommand,
    },

    /// Per-phase plan and summary counts
    Progress {
        /// Print a table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Inspect document frontmatter
    Frontmatter {
        #[command(subcommand)]
        subcommand: FrontmatterSubcommand,
    },

    /// Show or validate .planning/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = match cli.command {
        Commands::Requirements { subcommand } => cmd::requirements::run(&root, subcommand),
        Commands::Verify { subcommand } => cmd::verify::run(&root, subcommand),
        Commands::Validate { subcommand } => cmd::validate::run(&root, subcommand),
        Commands::Milestone { subcommand } => cmd::milestone::run(&root, subcommand),
        Commands::Progress { table } => cmd::progress::run(&root, table),
        Commands::Frontmatter { subcommand } => cmd::frontmatter::run(&root, subcommand),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
