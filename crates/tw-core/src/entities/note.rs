use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single entry in a task's append-only note log.
///
/// `at` is absent only for notes migrated from the legacy single-string
/// format, which carried no timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
    pub message: String,
}

impl Note {
    #[must_use]
    pub fn new(at: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            at: Some(at),
            message: message.into(),
        }
    }
}
