use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use planning_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective config (defaults filled in)
    Show,
    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => {
            let config = Config::load(root).context("failed to load config")?;
            print_json(&config)
        }
        ConfigSubcommand::Validate => validate(root),
    }
}

fn validate(root: &Path) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    print_json(&serde_json::json!({ "warnings": warnings }))?;

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
