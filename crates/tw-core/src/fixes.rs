//! Change reports produced by the auto-fixer and auto-transition.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which corrective action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// A workable task with unfinished dependencies was demoted to `blocked`.
    DependencyStatus,
    /// An unrecognized agent identifier was rewritten to a canonical role.
    AgentMigration,
    /// A `blocked` task whose dependencies are now complete moved to `todo`.
    AutoTransition,
}

/// How an unrecognized agent identifier was mapped to a canonical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// Found in the alias table.
    ExactMatch,
    /// One role scored strictly highest on keyword hits.
    ContentScore,
    /// Zero hits or a tie; the configured fallback role was used.
    Fallback,
}

impl ResolutionMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactMatch => "exact-match",
            Self::ContentScore => "content-score",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field rewrite on one task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AppliedFix {
    pub kind: FixKind,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ResolutionMethod>,
}

impl AppliedFix {
    /// Human-readable one-liner, e.g. `todo -> blocked` or
    /// `CODEFORGE -> DEVELOPER (exact-match)`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.method {
            Some(method) => format!("{} -> {} ({method})", self.from, self.to),
            None => format!("{} -> {}", self.from, self.to),
        }
    }
}

/// Fixes grouped by task id, ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FixReport {
    pub changes: BTreeMap<String, Vec<AppliedFix>>,
}

impl FixReport {
    pub fn record(&mut self, task_id: impl Into<String>, fix: AppliedFix) {
        self.changes.entry(task_id.into()).or_default().push(fix);
    }

    /// Task id to change description; a task with several fixes has them
    /// joined with `"; "`.
    #[must_use]
    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.changes
            .iter()
            .map(|(id, fixes)| {
                let text = fixes
                    .iter()
                    .map(AppliedFix::describe)
                    .collect::<Vec<_>>()
                    .join("; ");
                (id.clone(), text)
            })
            .collect()
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn fix_count(&self) -> usize {
        self.changes.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
