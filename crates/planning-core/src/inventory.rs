//! Read-only scan of `.planning/phases/`.
//!
//! Each `NN-slug` or `NN.M-slug` directory becomes a [`PhaseEntry`] whose
//! plans and summaries are paired by the shared `NN-MM` prefix of their
//! file names.

use crate::error::Result;
use crate::paths::{self, PhaseNumber};
use crate::plan::PlanDocument;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummaryPair {
    pub plan_id: String,
    pub has_plan: bool,
    pub has_summary: bool,
}

impl PlanSummaryPair {
    /// Plan number within the phase (`01-03` → 3).
    pub fn plan_number(&self) -> Option<u32> {
        self.plan_id.rsplit('-').next()?.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseEntry {
    pub number: PhaseNumber,
    pub slug: String,
    pub dir_name: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub pairs: Vec<PlanSummaryPair>,
    pub task_count: usize,
}

impl PhaseEntry {
    pub fn plan_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.has_plan).count()
    }

    pub fn summary_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.has_summary).count()
    }

    /// Plans with no summary yet.
    pub fn incomplete_plans(&self) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|p| p.has_plan && !p.has_summary)
            .map(|p| p.plan_id.clone())
            .collect()
    }

    /// Summaries with no matching plan.
    pub fn orphan_summaries(&self) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|p| p.has_summary && !p.has_plan)
            .map(|p| p.plan_id.clone())
            .collect()
    }

    pub fn plan_path(&self, plan_id: &str) -> PathBuf {
        self.path.join(format!("{plan_id}-PLAN.md"))
    }

    pub fn summary_path(&self, plan_id: &str) -> PathBuf {
        self.path.join(format!("{plan_id}-SUMMARY.md"))
    }

    /// Summary files in plan-id order.
    pub fn summary_paths(&self) -> Vec<PathBuf> {
        self.pairs
            .iter()
            .filter(|p| p.has_summary)
            .map(|p| self.summary_path(&p.plan_id))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    pub phases: Vec<PhaseEntry>,
}

impl Inventory {
    /// Scan the project's phases directory. A missing directory is an empty
    /// inventory.
    pub fn scan(root: &Path) -> Result<Self> {
        Self::scan_dir(&paths::phases_dir(root))
    }

    pub fn scan_dir(phases_dir: &Path) -> Result<Self> {
        if !phases_dir.is_dir() {
            debug!(dir = %phases_dir.display(), "no phases directory");
            return Ok(Self::default());
        }

        let mut phases = Vec::new();
        for entry in std::fs::read_dir(phases_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            let Some((number, slug)) = paths::parse_phase_dir(&dir_name) else {
                debug!(dir = %dir_name, "skipping non-phase directory");
                continue;
            };
            phases.push(scan_phase(number, slug, dir_name, entry.path())?);
        }
        phases.sort_by(|a, b| (a.number, &a.dir_name).cmp(&(b.number, &b.dir_name)));

        debug!(phases = phases.len(), "scanned phases directory");
        Ok(Self { phases })
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn plan_count(&self) -> usize {
        self.phases.iter().map(PhaseEntry::plan_count).sum()
    }

    pub fn summary_count(&self) -> usize {
        self.phases.iter().map(PhaseEntry::summary_count).sum()
    }

    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.task_count).sum()
    }

    pub fn find_phase(&self, number: PhaseNumber) -> Option<&PhaseEntry> {
        self.phases.iter().find(|p| p.number == number)
    }
}

fn scan_phase(number: PhaseNumber, slug: String, dir_name: String, path: PathBuf) -> Result<PhaseEntry> {
    let mut pairs: BTreeMap<String, PlanSummaryPair> = BTreeMap::new();
    for entry in std::fs::read_dir(&path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(id) = paths::plan_id_from_plan_file(&name) {
            pair_for(&mut pairs, id).has_plan = true;
        } else if let Some(id) = paths::plan_id_from_summary_file(&name) {
            pair_for(&mut pairs, id).has_summary = true;
        }
    }

    let mut entry = PhaseEntry {
        number,
        slug,
        dir_name,
        path,
        pairs: pairs.into_values().collect(),
        task_count: 0,
    };

    let mut task_count = 0;
    for pair in entry.pairs.iter().filter(|p| p.has_plan) {
        let text = std::fs::read_to_string(entry.plan_path(&pair.plan_id))?;
        task_count += PlanDocument::parse(&text).tasks.len();
    }
    entry.task_count = task_count;
    Ok(entry)
}

fn pair_for<'a>(pairs: &'a mut BTreeMap<String, PlanSummaryPair>, id: &str) -> &'a mut PlanSummaryPair {
    pairs
        .entry(id.to_string())
        .or_insert_with(|| PlanSummaryPair {
            plan_id: id.to_string(),
            has_plan: false,
            has_summary: false,
        })
}

// ---------------------------------------------------------------------------
// Roadmap / disk union
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseRecord {
    pub number: PhaseNumber,
    pub slug: String,
    pub on_disk_path: Option<PathBuf>,
    pub declared_in_roadmap: bool,
}

/// Union of roadmap-declared phase numbers and on-disk phase directories,
/// ordered by number.
pub fn phase_records(declared: &[PhaseNumber], inventory: &Inventory) -> Vec<PhaseRecord> {
    let mut records: BTreeMap<(PhaseNumber, String), PhaseRecord> = BTreeMap::new();
    for phase in &inventory.phases {
        records.insert(
            (phase.number, phase.dir_name.clone()),
            PhaseRecord {
                number: phase.number,
                slug: phase.slug.clone(),
                on_disk_path: Some(phase.path.clone()),
                declared_in_roadmap: declared.contains(&phase.number),
            },
        );
    }
    for &number in declared {
        if inventory.find_phase(number).is_none() {
            records.insert(
                (number, String::new()),
                PhaseRecord {
                    number,
                    slug: String::new(),
                    on_disk_path: None,
                    declared_in_roadmap: true,
                },
            );
        }
    }
    records.into_values().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
