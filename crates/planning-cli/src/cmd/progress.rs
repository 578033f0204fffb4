use crate::output::{print_json, print_table};
use anyhow::Context;
use planning_core::progress;
use std::path::Path;

pub fn run(root: &Path, table: bool) -> anyhow::Result<()> {
    let report = progress::progress(root).context("failed to compute progress")?;

    if !table {
        return print_json(&report);
    }

    if let Some(m) = &report.milestone {
        println!("{m}\n");
    }
    let rows = report
        .phases
        .iter()
        .map(|p| {
            vec![
                p.number.to_string(),
                p.name.clone(),
                format!("{}/{}", p.summaries, p.plans),
                p.tasks.to_string(),
                p.status.to_string(),
            ]
        })
        .collect();
    print_table(&["PHASE", "NAME", "SUMMARIES", "TASKS", "STATUS"], rows);
    println!(
        "\n{}% of {} plans complete",
        report.percent, report.total_plans
    );
    Ok(())
}
