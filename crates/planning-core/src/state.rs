//! STATE.md is a singleton document of `**Field:** value` lines rewritten in place.

use crate::error::Result;
use crate::paths;
use regex::Regex;
use std::path::Path;
use tracing::debug;

pub const STATUS: &str = "Status";
pub const LAST_ACTIVITY: &str = "Last Activity";
pub const LAST_ACTIVITY_DESCRIPTION: &str = "Last Activity Description";

fn field_re(field: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?m)^([ \t]*\*\*{}:\*\*[ \t]*)([^\r\n]*)",
        regex::escape(field)
    ))?)
}

/// Value of `**field:** value`, if present.
pub fn read_field(text: &str, field: &str) -> Result<Option<String>> {
    let re = field_re(field)?;
    Ok(re.captures(text).map(|c| c[2].trim().to_string()))
}

/// Replace the value of the first `**field:**` line. Returns `None` when the
/// field is absent.
pub fn replace_field(text: &str, field: &str, value: &str) -> Result<Option<String>> {
    let re = field_re(field)?;
    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };
    let Some(old) = caps.get(2) else {
        return Ok(None);
    };
    let mut out = String::with_capacity(text.len() + value.len());
    out.push_str(&text[..old.start()]);
    out.push_str(value);
    out.push_str(&text[old.end()..]);
    Ok(Some(out))
}

/// Rewrite several fields of `.planning/STATE.md` in one write.
///
/// Returns `false` without touching disk when STATE.md does not exist.
/// Fields missing from the document are left absent.
pub fn update_fields(root: &Path, updates: &[(&str, &str)]) -> Result<bool> {
    let path = paths::state_path(root);
    let Some(mut text) = crate::io::read_optional(&path)? else {
        return Ok(false);
    };
    for (field, value) in updates {
        let previous = read_field(&text, field)?;
        match replace_field(&text, field, value)? {
            Some(next) => {
                debug!(field, ?previous, value, "updated STATE.md field");
                text = next;
            }
            None => debug!(field, "STATE.md has no such field"),
        }
    }
    crate::io::atomic_write(&path, text.as_bytes())?;
    Ok(true)
}
