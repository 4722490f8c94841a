//! Manual status changes and automatic promotion of unblocked work.
//!
//! The validator only checks the dependency invariant; this module is what
//! the CLI goes through to move a task, and it refuses moves that would
//! break the invariant in the first place.

use chrono::{DateTime, Utc};
use tw_core::enums::TaskStatus;
use tw_core::errors::CoreError;
use tw_core::fixes::{AppliedFix, FixKind, FixReport};
use tw_core::task_set::TaskSet;

use crate::graph::DependencyGraph;

/// Result of a successful [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from: TaskStatus,
    pub to: TaskStatus,
    /// Blocked dependents promoted to `todo` because this task completed.
    pub promoted: Vec<String>,
}

/// Move task `id` to `to`.
///
/// Moving to the current status is rejected like any other illegal move.
/// Completing a task promotes every `blocked` dependent whose direct
/// dependencies are now all complete.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `id` is not in the set.
/// - [`CoreError::InvalidTransition`] if the state machine forbids the move.
/// - [`CoreError::DependenciesUnsatisfied`] when moving into `todo` or
///   `in_progress` while a direct dependency is not complete.
pub fn transition(
    set: &mut TaskSet,
    id: &str,
    to: TaskStatus,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, CoreError> {
    let task = set.get(id).ok_or_else(|| CoreError::NotFound { id: id.into() })?;
    let from = task.status;

    if !from.can_transition_to(to) {
        return Err(CoreError::InvalidTransition {
            id: id.into(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    if to.is_workable() {
        let graph = DependencyGraph::build(set);
        let pending = graph.pending_dependencies(task);
        if !pending.is_empty() {
            return Err(CoreError::DependenciesUnsatisfied {
                id: id.into(),
                to: to.to_string(),
                pending: pending
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }

    let task = set
        .get_mut(id)
        .ok_or_else(|| CoreError::NotFound { id: id.into() })?;
    task.status = to;
    task.touch(now);
    if let Some(message) = note.map(str::trim).filter(|m| !m.is_empty()) {
        task.append_note(now, message);
    }
    tracing::info!(task = %id, %from, %to, "status changed");

    let promoted = if to == TaskStatus::Complete {
        let graph = DependencyGraph::build(set);
        let ready = graph
            .dependents(id)
            .into_iter()
            .filter(|dependent| {
                set.get(dependent).is_some_and(|t| {
                    t.status == TaskStatus::Blocked && graph.is_satisfied(t)
                })
            })
            .collect::<Vec<_>>();
        promote(set, &ready, now)
    } else {
        Vec::new()
    };

    Ok(TransitionOutcome { from, to, promoted })
}

/// Promote every `blocked` task whose direct dependencies are all complete
/// to `todo`. A blocked task with no dependencies has nothing blocking it
/// and is promoted too.
pub fn auto_transition(set: &mut TaskSet, now: DateTime<Utc>) -> FixReport {
    let graph = DependencyGraph::build(set);
    let ready = set
        .iter()
        .filter(|task| task.status == TaskStatus::Blocked && graph.is_satisfied(task))
        .map(|task| task.id.clone())
        .collect::<Vec<_>>();

    let mut report = FixReport::default();
    for id in promote(set, &ready, now) {
        report.record(
            id,
            AppliedFix {
                kind: FixKind::AutoTransition,
                from: TaskStatus::Blocked.to_string(),
                to: TaskStatus::Todo.to_string(),
                method: None,
            },
        );
    }
    report
}

fn promote(set: &mut TaskSet, ids: &[String], now: DateTime<Utc>) -> Vec<String> {
    let mut promoted = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(task) = set.get_mut(id) else {
            continue;
        };
        task.status = TaskStatus::Todo;
        task.append_note(now, "Auto-transition: blocked -> todo (dependencies complete)");
        tracing::info!(task = %id, "promoted blocked task to todo");
        promoted.push(id.clone());
    }
    promoted
}
