use crate::error::{PlanningError, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PHASES_DIR: &str = ".planning/phases";
pub const MILESTONES_DIR: &str = ".planning/milestones";

pub const ROADMAP_FILE: &str = ".planning/ROADMAP.md";
pub const REQUIREMENTS_FILE: &str = ".planning/REQUIREMENTS.md";
pub const STATE_FILE: &str = ".planning/STATE.md";
pub const MILESTONES_FILE: &str = ".planning/MILESTONES.md";
pub const CONFIG_FILE: &str = ".planning/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn phases_dir(root: &Path) -> PathBuf {
    root.join(PHASES_DIR)
}

pub fn milestones_dir(root: &Path) -> PathBuf {
    root.join(MILESTONES_DIR)
}

pub fn roadmap_path(root: &Path) -> PathBuf {
    root.join(ROADMAP_FILE)
}

pub fn requirements_path(root: &Path) -> PathBuf {
    root.join(REQUIREMENTS_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn milestones_path(root: &Path) -> PathBuf {
    root.join(MILESTONES_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// `.planning/milestones/<version>-ROADMAP.md`
pub fn archived_roadmap(root: &Path, version: &str) -> PathBuf {
    milestones_dir(root).join(format!("{version}-ROADMAP.md"))
}

/// `.planning/milestones/<version>-REQUIREMENTS.md`
pub fn archived_requirements(root: &Path, version: &str) -> PathBuf {
    milestones_dir(root).join(format!("{version}-REQUIREMENTS.md"))
}

/// `.planning/milestones/<version>-phases/`
pub fn archived_phases_dir(root: &Path, version: &str) -> PathBuf {
    milestones_dir(root).join(format!("{version}-phases"))
}

// ---------------------------------------------------------------------------
// Naming conventions
// ---------------------------------------------------------------------------

static PHASE_DIR_RE: OnceLock<Regex> = OnceLock::new();
static PLAN_FILE_RE: OnceLock<Regex> = OnceLock::new();
static SUMMARY_FILE_RE: OnceLock<Regex> = OnceLock::new();

fn phase_dir_re() -> &'static Regex {
    PHASE_DIR_RE.get_or_init(|| Regex::new(r"^(\d+)(?:\.(\d+))?(?:-(.+))?$").unwrap())
}

fn plan_file_re() -> &'static Regex {
    PLAN_FILE_RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?-\d+)-PLAN\.md$").unwrap())
}

fn summary_file_re() -> &'static Regex {
    SUMMARY_FILE_RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?-\d+)-SUMMARY\.md$").unwrap())
}

/// An integer phase (`3`) or a decimal phase inserted after one (`2.1`).
/// Orders `2 < 2.1 < 2.2 < 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseNumber {
    pub major: u32,
    pub minor: Option<u32>,
}

impl PhaseNumber {
    pub fn integer(major: u32) -> Self {
        Self { major, minor: None }
    }

    pub fn is_integer(&self) -> bool {
        self.minor.is_none()
    }

    /// `3`, `03`, `2.1`, `02.1`. Phase numbering starts at 1.
    pub fn parse(label: &str) -> Option<Self> {
        let (major, minor) = match label.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (label, None),
        };
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(major) || !minor.map_or(true, digits) {
            return None;
        }
        let major: u32 = major.parse().ok()?;
        if major == 0 {
            return None;
        }
        let minor = minor.map(str::parse::<u32>).transpose().ok()?;
        Some(Self { major, minor })
    }
}

impl fmt::Display for PhaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{minor}", self.major),
            None => write!(f, "{}", self.major),
        }
    }
}

/// Integer phases stay JSON numbers; decimal phases become strings (`"2.1"`).
impl Serialize for PhaseNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.minor {
            Some(_) => serializer.collect_str(self),
            None => serializer.serialize_u32(self.major),
        }
    }
}

/// Split an `NN-slug` or `NN.M-slug` directory name into its phase number
/// and slug.
pub fn parse_phase_dir(name: &str) -> Option<(PhaseNumber, String)> {
    let caps = phase_dir_re().captures(name)?;
    let label = match caps.get(2) {
        Some(minor) => format!("{}.{}", &caps[1], minor.as_str()),
        None => caps[1].to_string(),
    };
    let number = PhaseNumber::parse(&label)?;
    let slug = caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some((number, slug))
}

/// `01-02-PLAN.md` → `01-02`
pub fn plan_id_from_plan_file(name: &str) -> Option<&str> {
    plan_file_re()
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `01-02-SUMMARY.md` → `01-02`
pub fn plan_id_from_summary_file(name: &str) -> Option<&str> {
    summary_file_re()
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Parse a user-supplied phase reference (`1`, `01`, `Phase 1`, `2.1`).
pub fn parse_phase_number(input: &str) -> Result<PhaseNumber> {
    let trimmed = input.trim();
    let label = trimmed
        .strip_prefix("Phase")
        .or_else(|| trimmed.strip_prefix("phase"))
        .unwrap_or(trimmed)
        .trim();
    PhaseNumber::parse(label).ok_or_else(|| PlanningError::InvalidPhaseNumber(input.to_string()))
}

/// Milestone versions become file-name prefixes, so they must stay inside
/// the milestones directory.
pub fn validate_version(version: &str) -> Result<()> {
    if version.trim().is_empty()
        || version.contains('/')
        || version.contains('\\')
        || version.contains("..")
        || version.contains('\0')
    {
        return Err(PlanningError::InvalidVersion(version.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
