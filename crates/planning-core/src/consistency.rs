use crate::config::ConsistencyConfig;
use crate::error::Result;
use crate::inventory::{phase_records, Inventory, PhaseEntry};
use crate::plan::PlanDocument;
use crate::paths::{self, PhaseNumber};
use crate::roadmap;
use serde::Serialize;
use std::path::Path;

/// Roadmap-vs-disk drift. Every finding is advisory.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub passed: bool,
    pub warning_count: usize,
    pub warnings: Vec<String>,
}

impl ConsistencyReport {
    fn from_warnings(warnings: Vec<String>) -> Self {
        Self {
            passed: warnings.is_empty(),
            warning_count: warnings.len(),
            warnings,
        }
    }
}

pub fn check_consistency(root: &Path, config: &ConsistencyConfig) -> Result<ConsistencyReport> {
    let inventory = Inventory::scan(root)?;
    let roadmap = crate::io::read_optional(&paths::roadmap_path(root))?;

    let mut warnings = match roadmap {
        Some(text) => roadmap_warnings(&roadmap::declared_numbers(&text), &inventory),
        None => vec!["ROADMAP.md not found".to_string()],
    };

    for phase in &inventory.phases {
        if config.check_plan_numbering {
            warnings.extend(plan_numbering_warnings(phase));
        }
        for id in phase.orphan_summaries() {
            warnings.push(format!(
                "Summary {id}-SUMMARY.md in {} has no matching PLAN",
                phase.dir_name
            ));
        }
        if config.check_wave_frontmatter {
            warnings.extend(wave_warnings(phase)?);
        }
    }

    Ok(ConsistencyReport::from_warnings(warnings))
}

/// Cross-reference declared phase numbers (sorted, unique) against disk.
/// Only integer phases take part in gap detection.
pub fn roadmap_warnings(declared: &[PhaseNumber], inventory: &Inventory) -> Vec<String> {
    let mut warnings = Vec::new();

    for record in phase_records(declared, inventory) {
        match (&record.on_disk_path, record.declared_in_roadmap) {
            (Some(path), false) => {
                let dir = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                warnings.push(format!("Phase {dir} on disk but not in ROADMAP"));
            }
            (None, true) => {
                warnings.push(format!(
                    "Phase {} in ROADMAP but no directory on disk",
                    record.number
                ));
            }
            _ => {}
        }
    }

    let integers: Vec<u32> = declared
        .iter()
        .filter(|n| n.is_integer())
        .map(|n| n.major)
        .collect();
    warnings.extend(gap_warnings(&integers));
    warnings
}

/// Gaps in a sorted phase sequence, which is expected to start at 1.
pub fn gap_warnings(sorted: &[u32]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut expected = 1;
    let mut previous: Option<u32> = None;
    for &n in sorted {
        if n > expected {
            match previous {
                Some(prev) => {
                    warnings.push(format!("Gap in phase numbering between {prev} and {n}"))
                }
                None => warnings.push(format!("Gap in phase numbering between 0 and {n}")),
            }
        }
        expected = n + 1;
        previous = Some(n);
    }
    warnings
}

fn plan_numbering_warnings(phase: &PhaseEntry) -> Vec<String> {
    let mut numbers: Vec<u32> = phase
        .pairs
        .iter()
        .filter(|p| p.has_plan)
        .filter_map(|p| p.plan_number())
        .collect();
    numbers.sort_unstable();

    numbers
        .windows(2)
        .filter(|w| w[1] > w[0] + 1)
        .map(|w| {
            format!(
                "Gap in plan numbering in {}: {} to {}",
                phase.dir_name, w[0], w[1]
            )
        })
        .collect()
}

fn wave_warnings(phase: &PhaseEntry) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    for pair in phase.pairs.iter().filter(|p| p.has_plan) {
        let text = std::fs::read_to_string(phase.plan_path(&pair.plan_id))?;
        if !PlanDocument::parse(&text).has_field("wave") {
            warnings.push(format!(
                "{}/{}-PLAN.md: missing 'wave' in frontmatter",
                phase.dir_name, pair.plan_id
            ));
        }
    }
    Ok(warnings)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(roadmap: Option<&str>, dirs: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".planning/phases")).unwrap();
        if let Some(text) = roadmap {
            std::fs::write(dir.path().join(".planning/ROADMAP.md"), text).unwrap();
        }
        for d in dirs {
            std::fs::create_dir_all(dir.path().join(".planning/phases").join(d)).unwrap();
        }
        dir
    }

    fn check(dir: &TempDir) -> ConsistencyReport {
        check_consistency(dir.path(), &ConsistencyConfig::default()).unwrap()
    }

    #[test]
    fn consistent_project_passes() {
        let dir = project(
            Some("# Roadmap\n### Phase 1: A\n### Phase 2: B\n### Phase 3: C\n"),
            &["01-a", "02-b", "03-c"],
        );
        let report = check(&dir);
        assert!(report.passed, "warnings: {:?}", report.warnings);
        assert_eq!(report.warning_count, 0);
    }

    #[test]
    fn orphan_directory_warns() {
        let dir = project(Some("# Roadmap\n### Phase 1: A\n"), &["01-a", "02-orphan"]);
        let report = check(&dir);
        assert!(!report.passed);
        assert_eq!(report.warnings, vec!["Phase 02-orphan on disk but not in ROADMAP"]);
    }

    #[test]
    fn declared_gap_warns() {
        let dir = project(Some("# Roadmap\n### Phase 1: A\n### Phase 3: C\n"), &["01-a", "03-c"]);
        let report = check(&dir);
        assert_eq!(report.warnings, vec!["Gap in phase numbering between 1 and 3"]);
    }

    #[test]
    fn decimal_phases_cross_check_without_gaps() {
        let dir = project(
            Some("# Roadmap\n### Phase 1: A\n### Phase 2: B\n### Phase 2.1: Hotfix\n### Phase 3: C\n"),
            &["01-a", "02-b", "02.1-hotfix", "03-c"],
        );
        assert!(check(&dir).passed, "warnings: {:?}", check(&dir).warnings);

        let dir = project(
            Some("### Phase 1: A\n### Phase 1.2: Patch\n"),
            &["01-a", "01.1-urgent"],
        );
        assert_eq!(
            check(&dir).warnings,
            vec![
                "Phase 01.1-urgent on disk but not in ROADMAP",
                "Phase 1.2 in ROADMAP but no directory on disk",
            ]
        );
    }

    #[test]
    fn gap_detection_is_roadmap_only() {
        assert!(gap_warnings(&[1, 2, 3]).is_empty());
        assert!(gap_warnings(&[]).is_empty());
        assert_eq!(gap_warnings(&[2, 3]), vec!["Gap in phase numbering between 0 and 2"]);
        assert_eq!(
            gap_warnings(&[1, 3, 6]),
            vec![
                "Gap in phase numbering between 1 and 3",
                "Gap in phase numbering between 3 and 6"
            ]
        );
    }

    #[test]
    fn declared_phase_without_directory_warns() {
        let dir = project(Some("### Phase 1: A\n### Phase 2: B\n"), &["01-a"]);
        let report = check(&dir);
        assert_eq!(report.warnings, vec!["Phase 2 in ROADMAP but no directory on disk"]);
    }

    #[test]
    fn missing_roadmap_is_a_warning_not_an_error() {
        let dir = project(None, &["01-a"]);
        let report = check(&dir);
        assert_eq!(report.warnings, vec!["ROADMAP.md not found"]);
    }

    #[test]
    fn plan_level_findings() {
        let dir = project(Some("### Phase 1: A\n"), &["01-a"]);
        let p = dir.path().join(".planning/phases/01-a");
        std::fs::write(p.join("01-01-PLAN.md"), "---\nwave: 1\n---\n").unwrap();
        std::fs::write(p.join("01-03-PLAN.md"), "---\nplan: 03\n---\n").unwrap();
        std::fs::write(p.join("01-04-SUMMARY.md"), "# s\n").unwrap();

        let report = check(&dir);
        assert_eq!(
            report.warnings,
            vec![
                "Gap in plan numbering in 01-a: 1 to 3",
                "Summary 01-04-SUMMARY.md in 01-a has no matching PLAN",
                "01-a/01-03-PLAN.md: missing 'wave' in frontmatter",
            ]
        );

        let quiet = ConsistencyConfig {
            check_plan_numbering: false,
            check_wave_frontmatter: false,
        };
        let report = check_consistency(dir.path(), &quiet).unwrap();
        assert_eq!(report.warning_count, 1);
    }
}
