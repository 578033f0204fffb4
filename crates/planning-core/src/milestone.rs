//! Milestone completion.
//!
//! A best-effort sequence of independent steps: archive the roadmap, archive
//! the requirements, optionally relocate phase directories, append a record
//! to MILESTONES.md, and rewrite STATE.md. Each step reports its own outcome
//! and nothing is rolled back; re-running after a partial failure rewrites
//! the archives and appends another record.

use crate::error::Result;
use crate::frontmatter::parse_document;
use crate::inventory::Inventory;
use crate::{io, paths, state};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CompleteOptions {
    pub version: String,
    pub name: String,
    pub archive_phases: bool,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveFlags {
    pub roadmap: bool,
    pub requirements: bool,
    pub phases: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneReport {
    pub version: String,
    pub name: String,
    pub date: String,
    pub phases: usize,
    pub plans: usize,
    pub tasks: usize,
    pub accomplishments: Vec<String>,
    pub archived: ArchiveFlags,
    pub milestones_updated: bool,
    pub state_updated: bool,
}

/// One shipped milestone as appended to MILESTONES.md.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneRecord {
    pub version: String,
    pub name: String,
    pub date: NaiveDate,
    pub accomplishments: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneStats {
    pub phases: usize,
    pub plans: usize,
    pub tasks: usize,
}

impl MilestoneRecord {
    pub fn heading(&self) -> String {
        let title = if self.name.trim().is_empty() {
            self.version.clone()
        } else {
            format!("{} {}", self.version, self.name.trim())
        };
        format!("## {title} (Shipped: {})", self.date.format("%Y-%m-%d"))
    }

    pub fn render(&self, stats: MilestoneStats) -> String {
        let mut out = format!("{}\n\n", self.heading());
        out.push_str(&format!(
            "**Phases completed:** {} phases, {} plans, {} tasks\n\n",
            stats.phases, stats.plans, stats.tasks
        ));
        if !self.accomplishments.is_empty() {
            out.push_str("**Key accomplishments:**\n");
            for a in &self.accomplishments {
                out.push_str(&format!("- {a}\n"));
            }
            out.push('\n');
        }
        out.push_str("---\n\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

pub fn complete_milestone(root: &Path, opts: &CompleteOptions) -> Result<MilestoneReport> {
    paths::validate_version(&opts.version)?;
    let version = opts.version.as_str();
    let date = opts.date.format("%Y-%m-%d").to_string();

    // Everything is read before the first write so that moving phases or
    // writing archives cannot hide a source.
    let inventory = Inventory::scan(root)?;
    let accomplishments = collect_accomplishments(&inventory)?;
    let roadmap = io::read_optional(&paths::roadmap_path(root))?;
    let requirements = io::read_optional(&paths::requirements_path(root))?;
    let stats = MilestoneStats {
        phases: inventory.phase_count(),
        plans: inventory.plan_count(),
        tasks: inventory.task_count(),
    };

    let mut archived = ArchiveFlags::default();

    if let Some(text) = &roadmap {
        io::atomic_write(&paths::archived_roadmap(root, version), text.as_bytes())?;
        archived.roadmap = true;
        info!(version, "archived roadmap");
    }

    if let Some(text) = &requirements {
        let archive = format!(
            "{}\n{text}",
            requirements_archive_header(version, &opts.name, &date)
        );
        io::atomic_write(&paths::archived_requirements(root, version), archive.as_bytes())?;
        archived.requirements = true;
        info!(version, "archived requirements");
    }

    if opts.archive_phases {
        archived.phases = archive_phase_dirs(root, version)?;
    }

    let record = MilestoneRecord {
        version: version.to_string(),
        name: opts.name.clone(),
        date: opts.date,
        accomplishments: accomplishments.clone(),
    };
    append_record(root, &record, stats)?;
    info!(version, "appended milestone record");

    let status = format!("{version} milestone complete");
    let description = format!("{version} milestone completed and archived");
    let state_updated = state::update_fields(
        root,
        &[
            (state::STATUS, status.as_str()),
            (state::LAST_ACTIVITY, date.as_str()),
            (state::LAST_ACTIVITY_DESCRIPTION, description.as_str()),
        ],
    )?;
    if !state_updated {
        warn!("STATE.md not found; project state left unchanged");
    }

    Ok(MilestoneReport {
        version: version.to_string(),
        name: opts.name.clone(),
        date,
        phases: stats.phases,
        plans: stats.plans,
        tasks: stats.tasks,
        accomplishments,
        archived,
        milestones_updated: true,
        state_updated,
    })
}

/// `one-liner` frontmatter values of every summary, in scan order.
pub fn collect_accomplishments(inventory: &Inventory) -> Result<Vec<String>> {
    let mut found = Vec::new();
    for phase in &inventory.phases {
        for path in phase.summary_paths() {
            let text = std::fs::read_to_string(&path)?;
            let one_liner = parse_document(&text)
                .frontmatter
                .and_then(|fm| fm.get_str("one-liner").map(str::to_string))
                .filter(|s| !s.trim().is_empty());
            if let Some(line) = one_liner {
                found.push(line);
            }
        }
    }
    Ok(found)
}

pub fn requirements_archive_header(version: &str, name: &str, date: &str) -> String {
    let title = if name.trim().is_empty() {
        version.to_string()
    } else {
        format!("{version} {}", name.trim())
    };
    format!(
        "# Requirements Archive: {title}\n\n\
         **Archived:** {date}\n\
         **Status:** SHIPPED\n\n\
         For current requirements, see `.planning/REQUIREMENTS.md`.\n\n\
         ---\n"
    )
}

/// Move the phases directory under `milestones/<version>-phases/`.
///
/// When that destination already exists (a re-run), phase directories are
/// moved one at a time and any name already present is left in place.
/// Returns whether anything was moved.
fn archive_phase_dirs(root: &Path, version: &str) -> Result<bool> {
    let src = paths::phases_dir(root);
    if !io::dir_has_entries(&src)? {
        info!("no phase directories to archive");
        return Ok(false);
    }
    let dest = paths::archived_phases_dir(root, version);

    if !dest.exists() {
        io::ensure_dir(&paths::milestones_dir(root))?;
        std::fs::rename(&src, &dest)?;
        info!(dest = %dest.display(), "moved phases directory");
        return Ok(true);
    }

    let mut moved = 0;
    let mut kept = 0;
    for entry in std::fs::read_dir(&src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if target.exists() {
            warn!(
                entry = %entry.file_name().to_string_lossy(),
                "already archived; leaving in place"
            );
            kept += 1;
            continue;
        }
        std::fs::rename(entry.path(), &target)?;
        moved += 1;
    }
    if kept == 0 {
        std::fs::remove_dir(&src)?;
    }
    info!(moved, kept, "merged phases into existing archive");
    Ok(moved > 0)
}

fn append_record(root: &Path, record: &MilestoneRecord, stats: MilestoneStats) -> Result<()> {
    let path = paths::milestones_path(root);
    let mut text = io::read_optional(&path)?.unwrap_or_else(|| "# Milestones\n\n".to_string());
    if !text.is_empty() && !text.ends_with("\n\n") {
        text.push_str(if text.ends_with('\n') { "\n" } else { "\n\n" });
    }
    text.push_str(&record.render(stats));
    io::atomic_write(&path, text.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
