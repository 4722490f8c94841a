use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::Note;
use crate::enums::{Priority, TaskStatus};

/// A unit of trackable work assigned to an agent.
///
/// `title`, `description`, and `agent` default to empty strings when absent
/// from a header so the validator can report them instead of the loader
/// rejecting the record. Header keys this struct does not know are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub agent: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, deserialize_with = "deserialize_notes")]
    pub notes: Vec<Note>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Task {
    /// Build a task with the given identity and defaults for everything else.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        agent: impl Into<String>,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            agent: agent.into(),
            status,
            priority: Priority::default(),
            created_at: now,
            updated_at: now,
            due_date: None,
            dependencies: Vec::new(),
            tags: Vec::new(),
            estimated_hours: None,
            actual_hours: None,
            assignee: None,
            notes: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Lower-cased `title description`, the text agent keywords are matched
    /// against.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    #[must_use]
    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == id)
    }

    /// Append to the note log and refresh `updated_at`.
    pub fn append_note(&mut self, now: DateTime<Utc>, message: impl Into<String>) {
        self.notes.push(Note::new(now, message));
        self.touch(now);
    }

    /// Refresh `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Accept both the note list and the legacy single-string form, where the
/// whole log was one blob of text.
fn deserialize_notes<'de, D>(deserializer: D) -> Result<Vec<Note>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NotesRepr {
        Log(Vec<Note>),
        Legacy(String),
        Missing(()),
    }

    Ok(match NotesRepr::deserialize(deserializer)? {
        NotesRepr::Log(notes) => notes,
        NotesRepr::Legacy(text) if text.trim().is_empty() => Vec::new(),
        NotesRepr::Legacy(text) => vec![Note {
            at: None,
            message: text,
        }],
        NotesRepr::Missing(()) => Vec::new(),
    })
}
