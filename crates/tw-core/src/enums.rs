//! Status, priority, severity, and agent role enums for taskward.
//!
//! Status and priority use `snake_case` serialization. Agent roles serialize
//! as their canonical upper-case identifiers (`DEVELOPER`, `DEVOPS`, ...),
//! which is also how they appear in task headers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a task.
///
/// ```text
/// pending     → todo | blocked | cancelled
/// blocked     → todo | pending | cancelled
/// todo        → in_progress | blocked | cancelled | complete
/// in_progress → complete | todo | blocked | cancelled
/// complete    → in_progress | todo          (reopen)
/// cancelled   → pending | todo              (reactivate)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Blocked,
    Todo,
    InProgress,
    Complete,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Blocked,
        Self::Todo,
        Self::InProgress,
        Self::Complete,
        Self::Cancelled,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Todo, Self::Blocked, Self::Cancelled],
            Self::Blocked => &[Self::Todo, Self::Pending, Self::Cancelled],
            Self::Todo => &[
                Self::InProgress,
                Self::Blocked,
                Self::Cancelled,
                Self::Complete,
            ],
            Self::InProgress => &[Self::Complete, Self::Todo, Self::Blocked, Self::Cancelled],
            Self::Complete => &[Self::InProgress, Self::Todo],
            Self::Cancelled => &[Self::Pending, Self::Todo],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// `complete` and `cancelled` end a task's lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }

    /// A workable task is one an agent may actively pick up. Every direct
    /// dependency of a workable task must be complete.
    #[must_use]
    pub const fn is_workable(self) -> bool {
        matches!(self, Self::Todo | Self::InProgress)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Blocked => "blocked",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority of a task. Ordered from `Low` to `Critical`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of a validation issue.
///
/// The derived ordering is `Info < Warning < Error`; reports sort by it
/// descending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AgentRole
// ---------------------------------------------------------------------------

/// Canonical worker roles a task can be assigned to.
///
/// Any other agent identifier found on a task is either a known alias (see
/// the agent directory's alias table) or unrecognized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentRole {
    Analyst,
    Architect,
    Automation,
    DemoAgent,
    Designer,
    Developer,
    Devops,
    Documenter,
    Manager,
    Researcher,
    Reviewer,
    Security,
    Tester,
}

impl AgentRole {
    pub const ALL: [Self; 13] = [
        Self::Analyst,
        Self::Architect,
        Self::Automation,
        Self::DemoAgent,
        Self::Designer,
        Self::Developer,
        Self::Devops,
        Self::Documenter,
        Self::Manager,
        Self::Researcher,
        Self::Reviewer,
        Self::Security,
        Self::Tester,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analyst => "ANALYST",
            Self::Architect => "ARCHITECT",
            Self::Automation => "AUTOMATION",
            Self::DemoAgent => "DEMO_AGENT",
            Self::Designer => "DESIGNER",
            Self::Developer => "DEVELOPER",
            Self::Devops => "DEVOPS",
            Self::Documenter => "DOCUMENTER",
            Self::Manager => "MANAGER",
            Self::Researcher => "RESEARCHER",
            Self::Reviewer => "REVIEWER",
            Self::Security => "SECURITY",
            Self::Tester => "TESTER",
        }
    }

    /// Exact, case-sensitive match against the canonical identifiers.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == identifier)
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
