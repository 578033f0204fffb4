use crate::paths::PhaseNumber;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredPhase {
    /// Phase number as written (`3`, `2.1`).
    pub label: String,
    /// `None` only for labels that cannot name a phase, like `0`.
    pub number: Option<PhaseNumber>,
    pub title: String,
}

static PHASE_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static ROADMAP_TITLE_RE: OnceLock<Regex> = OnceLock::new();

fn phase_heading_re() -> &'static Regex {
    PHASE_HEADING_RE.get_or_init(|| {
        Regex::new(r"(?m)^#{2,4}[ \t]+Phase[ \t]+(\d+(?:\.\d+)?)[ \t]*(?::[ \t]*(.*?))?[ \t\r]*$")
            .unwrap()
    })
}

fn roadmap_title_re() -> &'static Regex {
    ROADMAP_TITLE_RE.get_or_init(|| Regex::new(r"(?m)^#[ \t]+Roadmap\b[: \t]*(.*?)[ \t\r]*$").unwrap())
}

/// Phases declared by `### Phase N: Title` headings, in document order.
pub fn declared_phases(text: &str) -> Vec<DeclaredPhase> {
    phase_heading_re()
        .captures_iter(text)
        .map(|caps| {
            let label = caps[1].to_string();
            DeclaredPhase {
                number: PhaseNumber::parse(&label),
                title: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
                label,
            }
        })
        .collect()
}

/// Sorted, de-duplicated phase numbers, decimal phases included.
pub fn declared_numbers(text: &str) -> Vec<PhaseNumber> {
    let mut numbers: Vec<PhaseNumber> = declared_phases(text)
        .into_iter()
        .filter_map(|p| p.number)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

/// Text after `# Roadmap` on the first matching H1 (`# Roadmap v1.0 MVP` → `v1.0 MVP`).
pub fn milestone_title(text: &str) -> Option<String> {
    roadmap_title_re()
        .captures(text)
        .map(|c| c[1].to_string())
        .filter(|s| !s.is_empty())
}
