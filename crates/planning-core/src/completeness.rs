use crate::error::{PlanningError, Result};
use crate::inventory::{Inventory, PhaseEntry};
use crate::paths::{self, PhaseNumber};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct CompletenessReport {
    pub complete: bool,
    pub phase: PhaseNumber,
    pub directory: String,
    pub plan_count: usize,
    pub summary_count: usize,
    pub incomplete_plans: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check that every plan in phase `phase` (`1`, `01`, `Phase 1`, `2.1`) has a
/// summary.
pub fn check_phase_completeness(root: &Path, phase: &str) -> Result<CompletenessReport> {
    let not_found = || PlanningError::PhaseNotFound(phase.to_string());
    let number = paths::parse_phase_number(phase).map_err(|_| not_found())?;
    let inventory = Inventory::scan(root)?;
    let entry = inventory.find_phase(number).ok_or_else(not_found)?;
    Ok(report_for(entry))
}

pub fn report_for(entry: &PhaseEntry) -> CompletenessReport {
    let incomplete_plans = entry.incomplete_plans();
    let orphans = entry.orphan_summaries();

    let mut errors = Vec::new();
    if !incomplete_plans.is_empty() {
        errors.push(format!(
            "Plans without summaries: {}",
            incomplete_plans.join(", ")
        ));
    }
    let mut warnings = Vec::new();
    if !orphans.is_empty() {
        warnings.push(format!("Summaries without plans: {}", orphans.join(", ")));
    }

    CompletenessReport {
        complete: incomplete_plans.is_empty(),
        phase: entry.number,
        directory: entry.dir_name.clone(),
        plan_count: entry.plan_count(),
        summary_count: entry.summary_count(),
        incomplete_plans,
        errors,
        warnings,
    }
}
