//! Frontmatter block parsing and splicing.
//!
//! # Responsibility
//! - Extract the leading `---` block of a markdown note into a value map.
//! - Rewrite single fields in place without disturbing the body or the
//!   other fields.
//!
//! # Invariants
//! - Parsing never fails; malformed lines are skipped.
//! - Removing the last field removes the whole block.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parsed frontmatter: field name to scalar value.
pub type Frontmatter = BTreeMap<String, Value>;

static FRONTMATTER_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---(?:\r?\n|\z)").expect("valid frontmatter block regex")
});

/// Returns the raw field lines of the leading block and the byte offset
/// where the body starts.
fn block(content: &str) -> Option<(&str, usize)> {
    let captures = FRONTMATTER_BLOCK_RE.captures(content)?;
    let inner = captures.get(1)?.as_str();
    let body_start = captures.get(0)?.end();
    Some((inner, body_start))
}

/// Parses the leading frontmatter block; returns an empty map when the
/// note has none.
pub fn parse(content: &str) -> Frontmatter {
    let Some((inner, _)) = block(content) else {
        return Frontmatter::new();
    };

    let mut fields = Frontmatter::new();
    for line in inner.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, raw)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), parse_scalar(raw.trim()));
    }
    fields
}

/// Returns a field only when it holds a string value; numbers, booleans,
/// and absent fields all read as `None`.
pub fn string_field<'a>(fields: &'a Frontmatter, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Sets or replaces one field, creating the block when the note has none.
pub fn set_field(content: &str, key: &str, value: &str) -> String {
    let Some((inner, body_start)) = block(content) else {
        return format!("---\n{key}: {value}\n---\n{content}");
    };

    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;
    for line in inner.lines() {
        if line_key(line) == Some(key) {
            lines.push(format!("{key}: {value}"));
            replaced = true;
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(format!("{key}: {value}"));
    }

    rebuild(&lines, &content[body_start..])
}

/// Removes one field; dropping the last field drops the whole block.
pub fn remove_field(content: &str, key: &str) -> String {
    let Some((inner, body_start)) = block(content) else {
        return content.to_string();
    };

    let lines: Vec<String> = inner
        .lines()
        .filter(|line| line_key(line) != Some(key))
        .map(str::to_string)
        .collect();

    if lines.iter().all(|line| line.trim().is_empty()) {
        return content[body_start..].to_string();
    }

    rebuild(&lines, &content[body_start..])
}

fn line_key(line: &str) -> Option<&str> {
    line.split_once(':').map(|(key, _)| key.trim())
}

fn rebuild(lines: &[String], body: &str) -> String {
    format!("---\n{}\n---\n{body}", lines.join("\n"))
}

fn parse_scalar(raw: &str) -> Value {
    if let Some(quoted) = unquote(raw) {
        return Value::String(quoted.to_string());
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(number) = raw.parse::<i64>() {
        return Value::Number(number.into());
    }
    if let Ok(number) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(number) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}

fn unquote(raw: &str) -> Option<&str> {
    let stripped = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| {
            raw.strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
        })?;
    Some(stripped)
}

#[cfg(test)]
mod tests {
    use super::{parse, remove_field, set_field, string_field};
    use serde_json::Value;

    const NOTE: &str = "---\nstage: done\npriority: 3\n---\nbody text\n";

    #[test]
    fn parse_reads_string_and_scalar_fields() {
        let fields = parse(NOTE);
        assert_eq!(string_field(&fields, "stage"), Some("done"));
        assert_eq!(fields.get("priority"), Some(&Value::from(3)));
    }

    #[test]
    fn parse_without_block_is_empty() {
        assert!(parse("just a body\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn string_field_ignores_non_string_values() {
        let fields = parse("---\nstage: 42\nflag: true\n---\n");
        assert_eq!(string_field(&fields, "stage"), None);
        assert_eq!(string_field(&fields, "flag"), None);
        assert_eq!(string_field(&fields, "missing"), None);
    }

    #[test]
    fn parse_strips_quotes_from_values() {
        let fields = parse("---\nstage: \"done\"\ntitle: 'a note'\n---\n");
        assert_eq!(string_field(&fields, "stage"), Some("done"));
        assert_eq!(string_field(&fields, "title"), Some("a note"));
    }

    #[test]
    fn set_field_replaces_existing_line_and_keeps_body() {
        let updated = set_field(NOTE, "stage", "archive");
        assert_eq!(updated, "---\nstage: archive\npriority: 3\n---\nbody text\n");
    }

    #[test]
    fn set_field_appends_missing_field() {
        let updated = set_field("---\npriority: 3\n---\nbody\n", "stage", "done");
        let fields = parse(&updated);
        assert_eq!(string_field(&fields, "stage"), Some("done"));
        assert_eq!(fields.get("priority"), Some(&Value::from(3)));
    }

    #[test]
    fn set_field_creates_block_when_absent() {
        let updated = set_field("body only\n", "stage", "done");
        assert_eq!(updated, "---\nstage: done\n---\nbody only\n");
    }

    #[test]
    fn remove_field_drops_line_but_keeps_others() {
        let updated = remove_field(NOTE, "stage");
        assert_eq!(updated, "---\npriority: 3\n---\nbody text\n");
    }

    #[test]
    fn remove_last_field_drops_whole_block() {
        let updated = remove_field("---\nstage: done\n---\nbody\n", "stage");
        assert_eq!(updated, "body\n");
    }

    #[test]
    fn remove_missing_field_is_a_no_op() {
        assert_eq!(remove_field(NOTE, "owner"), NOTE);
        assert_eq!(remove_field("no block\n", "stage"), "no block\n");
    }
}
