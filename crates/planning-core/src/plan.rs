use crate::frontmatter::{parse_document, Frontmatter, Value};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// TaskBlock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verify {
    pub automated: Option<String>,
    pub human: Option<String>,
}

impl Verify {
    pub fn has_check(&self) -> bool {
        self.automated.is_some() || self.human.is_some()
    }
}

/// One `<task ...> ... </task>` region. Child elements absent from the block
/// are `None`; whether that is a problem is the validator's call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskBlock {
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub name: Option<String>,
    pub files: Option<String>,
    pub action: Option<String>,
    pub verify: Option<Verify>,
    pub done: Option<String>,
}

impl TaskBlock {
    pub fn is_checkpoint(&self) -> bool {
        self.task_type
            .as_deref()
            .is_some_and(|t| t.starts_with("checkpoint"))
    }
}

static TASK_RE: OnceLock<Regex> = OnceLock::new();
static TYPE_ATTR_RE: OnceLock<Regex> = OnceLock::new();

fn task_re() -> &'static Regex {
    TASK_RE.get_or_init(|| Regex::new(r"(?s)<task\b([^>]*)>(.*?)</task>").unwrap())
}

fn type_attr_re() -> &'static Regex {
    TYPE_ATTR_RE.get_or_init(|| Regex::new(r#"\btype\s*=\s*["']([^"']*)["']"#).unwrap())
}

/// Content of the first `<tag>...</tag>` element in `block`, trimmed.
fn element(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut search = 0;
    while let Some(rel) = block[search..].find(&open) {
        let start = search + rel;
        let after_name = start + open.len();
        // `<name>` must not match `<names>`.
        let next = block[after_name..].chars().next();
        if !matches!(next, Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('\r')) {
            search = after_name;
            continue;
        }
        let content_start = after_name + block[after_name..].find('>')? + 1;
        let content_end = content_start + block[content_start..].find(&close)?;
        return Some(block[content_start..content_end].trim().to_string());
    }
    None
}

pub fn parse_tasks(body: &str) -> Vec<TaskBlock> {
    task_re()
        .captures_iter(body)
        .map(|caps| {
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let inner = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let verify = element(inner, "verify").map(|v| Verify {
                automated: element(&v, "automated"),
                human: element(&v, "human"),
            });
            TaskBlock {
                task_type: type_attr_re()
                    .captures(attrs)
                    .map(|c| c[1].to_string()),
                name: element(inner, "name"),
                files: element(inner, "files"),
                action: element(inner, "action"),
                verify,
                done: element(inner, "done"),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// PlanDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PlanDocument {
    pub frontmatter: Option<Frontmatter>,
    pub tasks: Vec<TaskBlock>,
}

impl PlanDocument {
    pub fn parse(text: &str) -> Self {
        let doc = parse_document(text);
        Self {
            tasks: parse_tasks(&doc.body),
            frontmatter: doc.frontmatter,
        }
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.frontmatter.as_ref().and_then(|fm| fm.get(key))
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// `wave` as an integer; absent or non-numeric waves are `None`.
    pub fn wave(&self) -> Option<u32> {
        self.field("wave")
            .and_then(Value::as_str)
            .and_then(|s| s.trim().parse().ok())
    }

    /// `depends_on` as plan ids. A scalar value counts as a single id.
    pub fn depends_on(&self) -> Option<Vec<String>> {
        self.field("depends_on").map(|v| match v {
            Value::List(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Value::Scalar(s) if s.is_empty() => Vec::new(),
            Value::Scalar(s) => vec![s.clone()],
            Value::Map(_) => Vec::new(),
        })
    }

    /// True only when `autonomous` is literally `false`.
    pub fn autonomous_is_false(&self) -> bool {
        self.field("autonomous").and_then(Value::as_str) == Some("false")
    }

    pub fn has_checkpoint(&self) -> bool {
        self.tasks.iter().any(TaskBlock::is_checkpoint)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
