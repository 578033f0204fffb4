use crate::error::Result;
use crate::inventory::{Inventory, PhaseEntry};
use crate::paths::{self, PhaseNumber};
use crate::{io, roadmap};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseStatus {
    Pending,
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Complete,
}

impl PhaseStatus {
    pub fn of(phase: &PhaseEntry) -> Self {
        let plans = phase.plan_count();
        let summaries = phase.summary_count();
        if plans == 0 {
            PhaseStatus::Pending
        } else if summaries == 0 {
            PhaseStatus::Planned
        } else if phase.incomplete_plans().is_empty() {
            PhaseStatus::Complete
        } else {
            PhaseStatus::InProgress
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseStatus::Pending => "Pending",
            PhaseStatus::Planned => "Planned",
            PhaseStatus::InProgress => "In Progress",
            PhaseStatus::Complete => "Complete",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseProgress {
    pub number: PhaseNumber,
    pub name: String,
    pub directory: String,
    pub plans: usize,
    pub summaries: usize,
    pub tasks: usize,
    pub status: PhaseStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub milestone: Option<String>,
    pub phases: Vec<PhaseProgress>,
    pub total_plans: usize,
    pub total_summaries: usize,
    pub percent: u32,
}

/// Per-phase plan/summary counts. Phase names come from ROADMAP.md headings
/// when available, else from the directory slug.
pub fn progress(root: &Path) -> Result<ProgressReport> {
    let inventory = Inventory::scan(root)?;
    let roadmap_text = io::read_optional(&paths::roadmap_path(root))?;

    let titles: HashMap<PhaseNumber, String> = roadmap_text
        .as_deref()
        .map(|text| {
            roadmap::declared_phases(text)
                .into_iter()
                .filter_map(|p| Some((p.number?, p.title)))
                .filter(|(_, t)| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let phases: Vec<PhaseProgress> = inventory
        .phases
        .iter()
        .map(|p| PhaseProgress {
            number: p.number,
            name: titles
                .get(&p.number)
                .cloned()
                .unwrap_or_else(|| p.slug.replace('-', " ")),
            directory: p.dir_name.clone(),
            plans: p.plan_count(),
            summaries: p.summary_count(),
            tasks: p.task_count,
            status: PhaseStatus::of(p),
        })
        .collect();

    let total_plans = inventory.plan_count();
    let completed: usize = inventory
        .phases
        .iter()
        .map(|p| p.plan_count() - p.incomplete_plans().len())
        .sum();

    Ok(ProgressReport {
        milestone: roadmap_text.as_deref().and_then(roadmap::milestone_title),
        phases,
        total_plans,
        total_summaries: inventory.summary_count(),
        percent: percent(completed, total_plans),
    })
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((done * 100) / total) as u32
}
