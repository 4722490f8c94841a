//! Validation issues and the ordered report that groups them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Severity;

/// The rule class that produced an issue.
///
/// Consumers select issues by rule rather than by message text; the
/// auto-fixer only acts on rules for which [`Rule::is_auto_fixable`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    // Per-record fields
    MissingField,
    InvalidIdFormat,
    TitleTooLong,
    DescriptionTooLong,
    // Timestamps
    FutureCreatedAt,
    FutureUpdatedAt,
    UpdatedBeforeCreated,
    CriticalWithoutDueDate,
    Overdue,
    DistantDueDate,
    // Effort
    NegativeEffort,
    EffortOverrun,
    // Lifecycle
    UnsatisfiedDependencies,
    BlockedWithoutDependencies,
    // Agents
    UnknownAgent,
    AgentCapabilityMismatch,
    AgentOverloaded,
    AgentIdle,
    // Tags
    TooManyTags,
    UnrecognizedTag,
    // Dependencies
    TooManyDependencies,
    SelfDependency,
    DuplicateDependency,
    InvalidDependencyId,
    MissingDependency,
    DependencyCycle,
    // Loader
    UnreadableRecord,
}

impl Rule {
    /// Rules with a single unambiguous remedy the auto-fixer may apply.
    #[must_use]
    pub const fn is_auto_fixable(self) -> bool {
        matches!(self, Self::UnsatisfiedDependencies | Self::UnknownAgent)
    }
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Issue {
    pub rule: Rule,
    pub severity: Severity,
    /// The task this issue concerns; `None` for system-wide issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub field: String,
    pub message: String,
}

impl Issue {
    #[must_use]
    pub fn for_task(
        rule: Rule,
        severity: Severity,
        task_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            severity,
            task_id: Some(task_id.into()),
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn system(
        rule: Rule,
        severity: Severity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            severity,
            task_id: None,
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn concerns(&self, task_id: &str) -> bool {
        self.task_id.as_deref() == Some(task_id)
    }
}

/// Per-severity issue counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// Every issue found in one validation pass, in report order.
///
/// Order: severity descending; within a severity, system-wide issues first,
/// then task id ascending; issues that tie keep the order they were emitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    #[must_use]
    pub fn from_issues(mut issues: Vec<Issue>) -> Self {
        issues.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });

        let mut summary = ReportSummary::default();
        for issue in &issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
        }

        Self { summary, issues }
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Info)
    }

    pub fn for_task<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues.iter().filter(move |i| i.concerns(task_id))
    }

    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.rule == rule)
    }

    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Split into `(warnings, errors)`; informational issues are counted
    /// with warnings.
    #[must_use]
    pub fn split(self) -> (Vec<Issue>, Vec<Issue>) {
        self.issues
            .into_iter()
            .partition(|issue| issue.severity != Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn keys(report: &ValidationReport) -> Vec<(Severity, Option<&str>, &str)> {
        report
            .issues
            .iter()
            .map(|i| (i.severity, i.task_id.as_deref(), i.field.as_str()))
            .collect()
    }

    #[test]
    fn orders_by_severity_then_task_id() {
        let report = ValidationReport::from_issues(vec![
            Issue::for_task(Rule::TooManyTags, Severity::Warning, "b", "tags", "w"),
            Issue::for_task(Rule::MissingField, Severity::Error, "c", "title", "e"),
            Issue::system(Rule::AgentIdle, Severity::Info, "agent", "i"),
            Issue::for_task(Rule::MissingField, Severity::Error, "a", "agent", "e"),
            Issue::system(Rule::DependencyCycle, Severity::Error, "dependencies", "e"),
        ]);

        assert_eq!(
            keys(&report),
            vec![
                (Severity::Error, None, "dependencies"),
                (Severity::Error, Some("a"), "agent"),
                (Severity::Error, Some("c"), "title"),
                (Severity::Warning, Some("b"), "tags"),
                (Severity::Info, None, "agent"),
            ]
        );
        assert_eq!(
            report.summary,
            ReportSummary {
                errors: 3,
                warnings: 1,
                infos: 1
            }
        );
    }

    #[test]
    fn ties_keep_emission_order() {
        let report = ValidationReport::from_issues(vec![
            Issue::for_task(Rule::MissingField, Severity::Error, "a", "title", "1"),
            Issue::for_task(Rule::MissingField, Severity::Error, "a", "agent", "2"),
        ]);
        let fields: Vec<_> = report.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "agent"]);
    }

    #[test]
    fn split_separates_errors() {
        let report = ValidationReport::from_issues(vec![
            Issue::for_task(Rule::TooManyTags, Severity::Warning, "a", "tags", "w"),
            Issue::for_task(Rule::UnknownAgent, Severity::Error, "a", "agent", "e"),
            Issue::system(Rule::AgentIdle, Severity::Info, "agent", "i"),
        ]);
        let (warnings, errors) = report.split();
        assert_eq!(errors.len(), 1);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn only_two_rules_are_auto_fixable() {
        assert!(Rule::UnsatisfiedDependencies.is_auto_fixable());
        assert!(Rule::UnknownAgent.is_auto_fixable());
        assert!(!Rule::CriticalWithoutDueDate.is_auto_fixable());
        assert!(!Rule::MissingDependency.is_auto_fixable());
    }
}
