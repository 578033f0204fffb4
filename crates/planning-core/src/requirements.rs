//! REQUIREMENTS.md keeps every requirement twice: as a checklist line
//! (`- [ ] **TEST-01**: ...`) and as a traceability row
//! (`| TEST-01 | Phase 1 | Pending |`). Mutations patch both in one rewrite
//! and leave every other line byte-for-byte intact.

use crate::error::Result;
use crate::paths;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const ID_PATTERN: &str = r"[A-Za-z][A-Za-z0-9_-]*-[0-9]+";

static CHECKLIST_RE: OnceLock<Regex> = OnceLock::new();
static TABLE_RE: OnceLock<Regex> = OnceLock::new();

/// Groups: 1 = text before the box, 2 = box state, 3 = id.
fn checklist_re() -> &'static Regex {
    CHECKLIST_RE.get_or_init(|| {
        Regex::new(&format!(r"^(\s*[-*]\s*\[)([ xX])\]\s*\*\*({ID_PATTERN})\*\*")).unwrap()
    })
}

/// Groups: 1 = id, 2 = phase cell, 3 = status cell (all trimmed).
fn table_re() -> &'static Regex {
    TABLE_RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*\|\s*({ID_PATTERN})\s*\|\s*([^|]*?)\s*\|\s*([^|]*?)\s*\|"
        ))
        .unwrap()
    })
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub phase: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Ledger {
    /// id → checked
    pub checklist: BTreeMap<String, bool>,
    pub table: BTreeMap<String, TableRow>,
}

impl Ledger {
    /// Ids whose checkbox and table status disagree, plus table rows with no
    /// checklist line. A checklist line without a row is not drift.
    pub fn drift(&self) -> Vec<String> {
        self.table
            .iter()
            .filter(|(id, row)| {
                let table_complete = row.status.eq_ignore_ascii_case("complete");
                self.checklist
                    .get(*id)
                    .map_or(true, |&checked| checked != table_complete)
            })
            .map(|(id, _)| id.clone())
            .collect()
    }
}

pub fn parse_ledger(text: &str) -> Ledger {
    let mut ledger = Ledger::default();
    for line in text.lines() {
        if let Some(caps) = checklist_re().captures(line) {
            ledger
                .checklist
                .insert(caps[3].to_string(), &caps[2] != " ");
        } else if let Some(caps) = table_re().captures(line) {
            ledger.table.insert(
                caps[1].to_string(),
                TableRow {
                    phase: caps[2].to_string(),
                    status: caps[3].to_string(),
                },
            );
        }
    }
    ledger
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerStatus {
    pub total: usize,
    pub complete: usize,
    pub pending: usize,
    pub drift: Vec<String>,
}

/// Checklist counts plus drift. `None` when REQUIREMENTS.md is absent.
pub fn ledger_status(root: &Path) -> Result<Option<LedgerStatus>> {
    let Some(text) = crate::io::read_optional(&paths::requirements_path(root))? else {
        return Ok(None);
    };
    let ledger = parse_ledger(&text);
    let complete = ledger.checklist.values().filter(|&&c| c).count();
    Ok(Some(LedgerStatus {
        total: ledger.checklist.len(),
        complete,
        pending: ledger.checklist.len() - complete,
        drift: ledger.drift(),
    }))
}

// ---------------------------------------------------------------------------
// Mark complete
// ---------------------------------------------------------------------------

/// Split `TEST-01,TEST-02`, `TEST-01 TEST-02`, or `[TEST-01, TEST-02]` into ids.
pub fn parse_ids(raw: &str) -> Vec<String> {
    raw.replace(['[', ']'], " ")
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkCompleteReport {
    pub updated: bool,
    pub marked_complete: Vec<String>,
    pub not_found: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MarkCompleteOutcome {
    Applied(MarkCompleteReport),
    Skipped { updated: bool, reason: String },
}

/// Result of patching document text for a list of ids.
#[derive(Debug, Clone)]
pub struct Patched {
    pub text: String,
    pub marked_complete: Vec<String>,
    pub not_found: Vec<String>,
}

/// Flip `- [ ] **ID**` to `- [x] **ID**` and `| ID | .. | Pending |` to
/// `Complete` for each id, in order. Ids match case-insensitively. Only a
/// literal `[ ]` box counts as a match, so an already-checked id lands in
/// `not_found`.
pub fn mark_complete_text(text: &str, ids: &[String]) -> Result<Patched> {
    let mut lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
    let mut marked_complete = Vec::new();
    let mut not_found = Vec::new();

    for id in ids {
        let matcher = IdMatcher::new(id)?;
        let mut checked = false;
        for line in lines.iter_mut() {
            if let Some(patched) = matcher.check_box(line) {
                *line = patched;
                checked = true;
            } else if let Some(patched) = matcher.complete_row(line) {
                *line = patched;
            }
        }
        if checked {
            marked_complete.push(id.clone());
        } else {
            not_found.push(id.clone());
        }
    }

    Ok(Patched {
        text: lines.concat(),
        marked_complete,
        not_found,
    })
}

/// Checklist and table patterns bound to one requested id.
struct IdMatcher {
    /// Group 1 ends just before the blank box.
    unchecked: Regex,
    /// Group 1 ends just before `Pending`.
    pending_row: Regex,
}

impl IdMatcher {
    fn new(id: &str) -> Result<Self> {
        let id = regex::escape(id);
        Ok(Self {
            unchecked: Regex::new(&format!(r"^(\s*[-*]\s*\[) \]\s*\*\*(?i:{id})\*\*"))?,
            pending_row: Regex::new(&format!(
                r"^(\s*\|\s*(?i:{id})\s*\|[^|]*\|\s*)Pending\s*\|"
            ))?,
        })
    }

    fn check_box(&self, line: &str) -> Option<String> {
        let open = self.unchecked.captures(line)?.get(1)?.end();
        Some(format!("{}x{}", &line[..open], &line[open + 1..]))
    }

    fn complete_row(&self, line: &str) -> Option<String> {
        let start = self.pending_row.captures(line)?.get(1)?.end();
        let end = start + "Pending".len();
        Some(format!("{}Complete{}", &line[..start], &line[end..]))
    }
}

pub fn mark_complete(root: &Path, ids: &[String]) -> Result<MarkCompleteOutcome> {
    let path = paths::requirements_path(root);
    let Some(text) = crate::io::read_optional(&path)? else {
        return Ok(MarkCompleteOutcome::Skipped {
            updated: false,
            reason: "REQUIREMENTS.md not found".to_string(),
        });
    };

    let patched = mark_complete_text(&text, ids)?;
    let updated = patched.text != text;
    if updated {
        crate::io::atomic_write(&path, patched.text.as_bytes())?;
    }
    debug!(
        marked = patched.marked_complete.len(),
        not_found = patched.not_found.len(),
        "requirements mark-complete"
    );

    Ok(MarkCompleteOutcome::Applied(MarkCompleteReport {
        updated,
        marked_complete: patched.marked_complete,
        not_found: patched.not_found,
        total: ids.len(),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
