//! Corrections for the two rules with a single safe remedy.
//!
//! - `UnknownAgent`: rewrite the agent to the role the directory suggests.
//! - `UnsatisfiedDependencies`: demote the task to `blocked`.
//!
//! The fixer works from a validation report, so it acts on exactly what the
//! validator flags and nothing else. Dependencies, due dates, and priority
//! are never touched.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tw_core::enums::{Severity, TaskStatus};
use tw_core::fixes::{AppliedFix, FixKind, FixReport};
use tw_core::issues::{Rule, ValidationReport};
use tw_core::task_set::TaskSet;

use crate::graph::DependencyGraph;
use crate::validate::Validator;

/// A fix computed but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFix {
    pub task_id: String,
    pub fix: AppliedFix,
    /// Why the change is made; recorded in the task's note log.
    pub reason: String,
}

impl PlannedFix {
    /// The note appended to the task when this fix is applied.
    #[must_use]
    pub fn note(&self) -> String {
        let subject = match self.fix.kind {
            FixKind::AgentMigration => "agent",
            FixKind::DependencyStatus | FixKind::AutoTransition => "status",
        };
        format!(
            "Auto-fix: {subject} {} -> {} ({})",
            self.fix.from, self.fix.to, self.reason
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AutoFixer<'a> {
    validator: Validator<'a>,
}

impl<'a> AutoFixer<'a> {
    #[must_use]
    pub const fn new(validator: Validator<'a>) -> Self {
        Self { validator }
    }

    /// Validate `set` and plan fixes for what the report flags.
    #[must_use]
    pub fn plan(&self, set: &TaskSet, now: DateTime<Utc>) -> Vec<PlannedFix> {
        let report = self.validator.validate_system(set, now);
        self.plan_from_report(set, &report)
    }

    /// Plan fixes for the auto-fixable error issues in `report`.
    ///
    /// Per task, agent migration is planned before the status change. Tasks
    /// are visited in id order.
    #[must_use]
    pub fn plan_from_report(&self, set: &TaskSet, report: &ValidationReport) -> Vec<PlannedFix> {
        let flagged: HashSet<(&str, Rule)> = report
            .issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error && issue.rule.is_auto_fixable())
            .filter_map(|issue| Some((issue.task_id.as_deref()?, issue.rule)))
            .collect();
        if flagged.is_empty() {
            return Vec::new();
        }

        let graph = DependencyGraph::build(set);
        let directory = self.validator.directory();
        let mut plan = Vec::new();

        for task in set.iter() {
            let id = task.id.as_str();

            if flagged.contains(&(id, Rule::UnknownAgent)) {
                let migration = directory.suggest_migration(&task.agent, task);
                plan.push(PlannedFix {
                    task_id: task.id.clone(),
                    fix: AppliedFix {
                        kind: FixKind::AgentMigration,
                        from: task.agent.clone(),
                        to: migration.role.to_string(),
                        method: Some(migration.method),
                    },
                    reason: migration.method.to_string(),
                });
            }

            if flagged.contains(&(id, Rule::UnsatisfiedDependencies)) && task.status.is_workable()
            {
                let pending = graph
                    .pending_dependencies(task)
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                plan.push(PlannedFix {
                    task_id: task.id.clone(),
                    fix: AppliedFix {
                        kind: FixKind::DependencyStatus,
                        from: task.status.to_string(),
                        to: TaskStatus::Blocked.to_string(),
                        method: None,
                    },
                    reason: format!("dependencies not complete: {pending}"),
                });
            }
        }

        plan
    }

    /// Plan and apply in one step.
    pub fn apply(&self, set: &mut TaskSet, now: DateTime<Utc>) -> FixReport {
        let plan = self.plan(set, now);
        apply_plan(set, plan, now)
    }
}

/// Apply planned fixes to `set`.
///
/// Each fix is independent: one whose task has gone, or whose field no
/// longer holds the planned `from` value, is skipped without affecting the
/// others.
pub fn apply_plan(set: &mut TaskSet, plan: Vec<PlannedFix>, now: DateTime<Utc>) -> FixReport {
    let mut report = FixReport::default();

    for planned in plan {
        let Some(task) = set.get_mut(&planned.task_id) else {
            tracing::warn!(task = %planned.task_id, "planned fix targets a missing task");
            continue;
        };

        let applied = match planned.fix.kind {
            FixKind::AgentMigration if task.agent == planned.fix.from => {
                task.agent.clone_from(&planned.fix.to);
                true
            }
            FixKind::DependencyStatus if task.status.as_str() == planned.fix.from => {
                task.status = TaskStatus::Blocked;
                true
            }
            _ => false,
        };
        if !applied {
            tracing::warn!(task = %planned.task_id, fix = %planned.fix.describe(), "stale fix skipped");
            continue;
        }

        task.append_note(now, planned.note());
        tracing::info!(
            task = %planned.task_id,
            kind = ?planned.fix.kind,
            change = %planned.fix.describe(),
            "auto-fix applied"
        );
        report.record(planned.task_id, planned.fix);
    }

    report
}
