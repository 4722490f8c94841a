//! Task file format: a YAML header between `---` lines, then free-form
//! markdown.
//!
//! ```text
//! ---
//! id: api-gateway
//! title: Build the API gateway
//! status: todo
//! ...
//! ---
//!
//! Narrative notes, acceptance criteria, anything.
//! ```
//!
//! Older files have no delimiters and carry `key: value` lines only.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_yaml::{Mapping, Value};
use tw_core::entities::Task;
use tw_core::enums::TaskStatus;

use crate::error::StoreError;

const DELIMITER: &str = "---";
const TIMESTAMP_FIELDS: [&str; 3] = ["created_at", "updated_at", "due_date"];
const LIST_FIELDS: [&str; 2] = ["dependencies", "tags"];
const TEXT_FIELDS: [&str; 5] = ["id", "title", "description", "agent", "assignee"];

/// What the file itself cannot say about a task.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// File name without extension, the fallback id.
    pub stem: &'a str,
    /// Status implied by the directory the file sits in.
    pub status: TaskStatus,
    /// Fallback for missing timestamps.
    pub modified: DateTime<Utc>,
}

/// A parsed task plus the markdown that followed its header.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDocument {
    pub task: Task,
    pub body: String,
}

/// Parse a task file. The error is a human-readable reason for the
/// unreadable-record report.
pub fn parse(content: &str, ctx: &FileContext<'_>) -> Result<TaskDocument, String> {
    let (mut header, body) = match split_front_matter(content) {
        Some((raw, body)) => (parse_header(raw)?, body.to_string()),
        None => parse_legacy(content)?,
    };

    fill_defaults(&mut header, ctx);
    stringify_scalars(&mut header);
    for field in TIMESTAMP_FIELDS {
        normalize_timestamp(&mut header, field)?;
    }

    let task: Task =
        serde_yaml::from_value(Value::Mapping(header)).map_err(|e| format!("invalid header: {e}"))?;
    Ok(TaskDocument { task, body })
}

/// Render a task file.
///
/// # Errors
///
/// Returns [`StoreError::Yaml`] if the header cannot be serialized.
pub fn render(task: &Task, body: &str) -> Result<String, StoreError> {
    let header = serde_yaml::to_string(task)?;
    let body = body.trim_start_matches(['\r', '\n']);
    if body.is_empty() {
        Ok(format!("{DELIMITER}\n{header}{DELIMITER}\n"))
    } else {
        Ok(format!("{DELIMITER}\n{header}{DELIMITER}\n\n{body}"))
    }
}

fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let (header, after) = if let Some(after) = rest.strip_prefix(DELIMITER) {
        ("", after)
    } else {
        let end = rest.find("\n---")?;
        (&rest[..end], &rest[end + 4..])
    };
    Some((header, after.trim_start_matches(['\r', '\n'])))
}

fn parse_header(raw: &str) -> Result<Mapping, String> {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err("header is not a key-value mapping".to_string()),
        Err(e) => Err(format!("invalid YAML header: {e}")),
    }
}

/// `key: value` lines; anything else is kept as body text.
fn parse_legacy(content: &str) -> Result<(Mapping, String), String> {
    let mut header = Mapping::new();
    let mut body = Vec::new();

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            body.push(line);
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains(' ') {
            body.push(line);
            continue;
        }
        header.insert(Value::from(key), legacy_value(key, value.trim()));
    }

    if !header.contains_key("id") {
        return Err("no YAML header and no 'id' line".to_string());
    }
    Ok((header, body.join("\n").trim().to_string()))
}

fn legacy_value(key: &str, raw: &str) -> Value {
    if LIST_FIELDS.contains(&key) {
        let items = raw
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|item| item.trim().trim_matches(['"', '\'']))
            .filter(|item| !item.is_empty())
            .map(Value::from)
            .collect();
        return Value::Sequence(items);
    }
    if raw.is_empty() {
        return Value::Null;
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => value,
        _ => Value::from(raw),
    }
}

fn fill_defaults(header: &mut Mapping, ctx: &FileContext<'_>) {
    if is_absent(header.get("id")) {
        header.insert(Value::from("id"), Value::from(ctx.stem));
    }
    if is_absent(header.get("status")) {
        header.insert(Value::from("status"), Value::from(ctx.status.as_str()));
    }
    if is_absent(header.get("created_at")) {
        header.insert(
            Value::from("created_at"),
            Value::from(ctx.modified.to_rfc3339()),
        );
    }
    if is_absent(header.get("updated_at")) {
        let created = header
            .get("created_at")
            .cloned()
            .unwrap_or_else(|| Value::from(ctx.modified.to_rfc3339()));
        header.insert(Value::from("updated_at"), created);
    }
}

/// YAML reads `id: 42` or `dependencies: [7]` as numbers; the task
/// model wants text. A lone scalar in a list field becomes a one-item list.
fn stringify_scalars(header: &mut Mapping) {
    for field in TEXT_FIELDS {
        if let Some(value) = header.get_mut(field) {
            if let Some(text) = scalar_text(value) {
                *value = Value::String(text);
            }
        }
    }
    for field in LIST_FIELDS {
        let Some(value) = header.get_mut(field) else {
            continue;
        };
        match value {
            Value::Sequence(items) => {
                for item in items.iter_mut() {
                    if let Some(text) = scalar_text(item) {
                        *item = Value::String(text);
                    }
                }
            }
            Value::Null => {}
            scalar => {
                let text = scalar_text(scalar).or_else(|| scalar.as_str().map(str::to_string));
                if let Some(text) = text {
                    *scalar = Value::Sequence(vec![Value::String(text)]);
                }
            }
        }
    }
}

/// Text of a number or boolean; `None` for everything else.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Timestamps without an offset are read as UTC; date-only values as
/// midnight UTC.
fn normalize_timestamp(header: &mut Mapping, field: &str) -> Result<(), String> {
    let Some(Value::String(raw)) = header.get(field) else {
        return Ok(());
    };
    let raw = raw.trim();
    if raw.is_empty() {
        header.insert(Value::from(field), Value::Null);
        return Ok(());
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
        .map_err(|_| format!("'{field}' is not a timestamp: {raw}"))?;

    header.insert(Value::from(field), Value::from(parsed.to_rfc3339()));
    Ok(())
}
