//! Frontmatter splitting and a small YAML-subset reader.
//!
//! Supported grammar: `key: scalar`, flow lists (`key: [a, b]`), block lists
//! (`- item` lines under a key) and nested mappings introduced by `key:` with
//! deeper-indented children. Anything else is skipped rather than rejected;
//! whether a malformed document is an error is decided by the caller.

use crate::error::{PlanningError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const DELIM: &str = "---";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Empty scalar, empty list, or empty map.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(m) => m.is_empty(),
        }
    }
}

/// Parsed frontmatter block, keyed by top-level field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Frontmatter {
    pub fields: BTreeMap<String, Value>,
}

impl Frontmatter {
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a dotted path such as `must_haves.truths`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_map()?.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub frontmatter: Option<Frontmatter>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Split raw text into frontmatter and body.
///
/// The frontmatter is the region between a leading `---` line and the next
/// `---` line. Without both delimiters the whole text is the body.
pub fn parse_document(text: &str) -> Document {
    match split(text) {
        Some((raw, body)) => Document {
            frontmatter: Some(parse_yaml_subset(raw)),
            body: body.to_string(),
        },
        None => Document {
            frontmatter: None,
            body: text.to_string(),
        },
    }
}

/// Read and split a document. `file` is resolved against `root` and echoed
/// verbatim in the not-found message.
pub fn load_document(root: &Path, file: &str) -> Result<Document> {
    let path = root.join(file);
    if !path.is_file() {
        return Err(PlanningError::FileNotFound(file.to_string()));
    }
    Ok(parse_document(&std::fs::read_to_string(&path)?))
}

/// Frontmatter of `file` as JSON, or the single value at dotted `field`.
/// A document without frontmatter yields an empty object.
pub fn frontmatter_json(root: &Path, file: &str, field: Option<&str>) -> Result<serde_json::Value> {
    let fm = load_document(root, file)?.frontmatter.unwrap_or_default();
    match field {
        None => Ok(serde_json::to_value(&fm)?),
        Some(path) => {
            let value = fm
                .get_path(path)
                .ok_or_else(|| PlanningError::FieldNotFound(path.to_string()))?;
            Ok(serde_json::to_value(value)?)
        }
    }
}

fn split(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let first_end = text.find('\n')?;
    if text[..first_end].trim_end() != DELIM {
        return None;
    }
    let rest = &text[first_end + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIM {
            let raw = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((raw, body));
        }
        offset += line.len();
    }
    None
}

// ---------------------------------------------------------------------------
// YAML subset
// ---------------------------------------------------------------------------

struct Line<'a> {
    indent: usize,
    content: &'a str,
}

impl Line<'_> {
    fn list_item(&self) -> Option<&str> {
        if self.content == "-" {
            Some("")
        } else {
            self.content.strip_prefix("- ").map(str::trim)
        }
    }
}

pub fn parse_yaml_subset(raw: &str) -> Frontmatter {
    let lines: Vec<Line> = raw
        .lines()
        .filter_map(|l| {
            let content = l.trim();
            if content.is_empty() || content.starts_with('#') {
                return None;
            }
            let indent = l.len() - l.trim_start().len();
            Some(Line { indent, content })
        })
        .collect();

    let mut pos = 0;
    let base = lines.first().map(|l| l.indent).unwrap_or(0);
    let mut fields = BTreeMap::new();
    while pos < lines.len() {
        parse_map(&lines, &mut pos, base, &mut fields);
        // Stray lines outdented past the base or orphan list items are skipped.
        if pos < lines.len() {
            pos += 1;
        }
    }
    Frontmatter { fields }
}

fn parse_map(lines: &[Line], pos: &mut usize, indent: usize, out: &mut BTreeMap<String, Value>) {
    while *pos < lines.len() {
        let line = &lines[*pos];
        if line.indent < indent {
            return;
        }
        if line.indent > indent || line.list_item().is_some() {
            return;
        }
        let Some((key, value)) = split_key_value(line.content) else {
            *pos += 1;
            continue;
        };
        *pos += 1;

        let parsed = if !value.is_empty() {
            parse_inline(value)
        } else {
            parse_nested(lines, pos, indent)
        };
        out.insert(key.to_string(), parsed);
    }
}

/// Children of a `key:` line with no inline value.
fn parse_nested(lines: &[Line], pos: &mut usize, parent_indent: usize) -> Value {
    let Some(next) = lines.get(*pos) else {
        return Value::Scalar(String::new());
    };
    if next.list_item().is_some() && next.indent >= parent_indent {
        return Value::List(parse_list(lines, pos, next.indent));
    }
    if next.indent > parent_indent {
        let mut map = BTreeMap::new();
        parse_map(lines, pos, next.indent, &mut map);
        return Value::Map(map);
    }
    Value::Scalar(String::new())
}

fn parse_list(lines: &[Line], pos: &mut usize, indent: usize) -> Vec<Value> {
    let mut items = Vec::new();
    while let Some(line) = lines.get(*pos) {
        if line.indent != indent {
            break;
        }
        let Some(item) = line.list_item() else {
            break;
        };
        items.push(parse_inline(item));
        *pos += 1;
    }
    items
}

fn split_key_value(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once(':')?;
    let key = key.trim();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return None;
    }
    // `key:value` without a space is a scalar like `http://x`, not a mapping.
    if !value.is_empty() && !value.starts_with([' ', '\t']) {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_inline(value: &str) -> Value {
    let value = value.trim();
    if value.starts_with('[') && value.ends_with(']') {
        return Value::List(parse_flow_list(&value[1..value.len() - 1]));
    }
    if value == "{}" {
        return Value::Map(BTreeMap::new());
    }
    Value::Scalar(strip_quotes(value).to_string())
}

fn parse_flow_list(inner: &str) -> Vec<Value> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in inner.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            }
            (None, ',') => {
                push_flow_item(&mut items, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_flow_item(&mut items, &current);
    items
}

fn push_flow_item(items: &mut Vec<Value>, raw: &str) {
    let raw = raw.trim();
    if !raw.is_empty() {
        items.push(Value::Scalar(strip_quotes(raw).to_string()));
    }
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        let (first, last) = (bytes[0], bytes[value.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
