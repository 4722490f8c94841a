//! Rule checks over single tasks and over the whole snapshot.
//!
//! Validation never stops early. Every rule runs against every readable
//! task and all findings are collected into one [`ValidationReport`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use tw_config::ValidationConfig;
use tw_core::entities::Task;
use tw_core::enums::{Priority, Severity, TaskStatus};
use tw_core::issues::{Issue, Rule, ValidationReport};
use tw_core::task_set::TaskSet;

use crate::directory::AgentDirectory;
use crate::graph::DependencyGraph;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid task id regex"));

/// Whether `id` is a well-formed task identifier.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    rules: &'a ValidationConfig,
    directory: &'a AgentDirectory,
}

impl<'a> Validator<'a> {
    #[must_use]
    pub const fn new(rules: &'a ValidationConfig, directory: &'a AgentDirectory) -> Self {
        Self { rules, directory }
    }

    #[must_use]
    pub const fn directory(&self) -> &'a AgentDirectory {
        self.directory
    }

    /// Per-task checks, split into `(warnings, errors)`. Informational
    /// findings are returned with the warnings.
    #[must_use]
    pub fn validate(
        &self,
        task: &Task,
        graph: &DependencyGraph,
        now: DateTime<Utc>,
    ) -> (Vec<Issue>, Vec<Issue>) {
        self.validate_task(task, graph, now)
            .into_iter()
            .partition(|issue| issue.severity != Severity::Error)
    }

    /// Every per-task rule, in emission order.
    #[must_use]
    pub fn validate_task(
        &self,
        task: &Task,
        graph: &DependencyGraph,
        now: DateTime<Utc>,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();
        self.check_fields(task, &mut issues);
        self.check_timestamps(task, now, &mut issues);
        check_effort(task, &mut issues);
        check_dependency_status(task, graph, &mut issues);
        self.check_agent(task, &mut issues);
        self.check_tags(task, &mut issues);
        self.check_dependency_list(task, &mut issues);
        issues
    }

    /// Per-task rules for every readable task plus the system-wide rules.
    #[must_use]
    pub fn validate_system(&self, set: &TaskSet, now: DateTime<Utc>) -> ValidationReport {
        let graph = DependencyGraph::build(set);
        let mut issues = Vec::new();

        for record in set.unreadable() {
            issues.push(Issue::system(
                Rule::UnreadableRecord,
                Severity::Error,
                "record",
                format!("Unreadable task record {}: {}", record.source, record.reason),
            ));
        }

        for task in set.iter() {
            issues.extend(self.validate_task(task, &graph, now));
            for missing in graph.missing_dependencies(task) {
                issues.push(issue(
                    task,
                    Rule::MissingDependency,
                    Severity::Error,
                    "dependencies",
                    format!("Dependency '{missing}' does not exist"),
                ));
            }
        }

        check_cycles(&graph, &mut issues);
        check_blocked_without_dependencies(set, &mut issues);
        self.check_workload(set, &mut issues);

        let report = ValidationReport::from_issues(issues);
        tracing::debug!(
            tasks = set.len(),
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            infos = report.summary.infos,
            "validation finished"
        );
        report
    }

    fn check_fields(&self, task: &Task, issues: &mut Vec<Issue>) {
        for (field, value) in [
            ("id", &task.id),
            ("title", &task.title),
            ("agent", &task.agent),
        ] {
            if value.trim().is_empty() {
                issues.push(issue(
                    task,
                    Rule::MissingField,
                    Severity::Error,
                    field,
                    format!("Required field '{field}' is missing or empty"),
                ));
            }
        }

        if !task.id.is_empty() && !is_valid_id(&task.id) {
            issues.push(issue(
                task,
                Rule::InvalidIdFormat,
                Severity::Error,
                "id",
                "Task id may only contain letters, digits, '-' and '_'",
            ));
        }

        let title_len = task.title.chars().count();
        if title_len > self.rules.max_title_length {
            issues.push(issue(
                task,
                Rule::TitleTooLong,
                Severity::Warning,
                "title",
                format!(
                    "Title is {title_len} characters (max {})",
                    self.rules.max_title_length
                ),
            ));
        }

        let description_len = task.description.chars().count();
        if description_len > self.rules.max_description_length {
            issues.push(issue(
                task,
                Rule::DescriptionTooLong,
                Severity::Warning,
                "description",
                format!(
                    "Description is {description_len} characters (max {})",
                    self.rules.max_description_length
                ),
            ));
        }
    }

    fn check_timestamps(&self, task: &Task, now: DateTime<Utc>, issues: &mut Vec<Issue>) {
        // Past chrono's range nothing can be in the future.
        let latest_allowed = Duration::try_seconds(self.rules.future_tolerance_secs)
            .and_then(|tolerance| now.checked_add_signed(tolerance));
        let is_future = |at: DateTime<Utc>| latest_allowed.is_some_and(|latest| at > latest);

        if is_future(task.created_at) {
            issues.push(issue(
                task,
                Rule::FutureCreatedAt,
                Severity::Warning,
                "created_at",
                "Created timestamp is in the future",
            ));
        }
        if is_future(task.updated_at) {
            issues.push(issue(
                task,
                Rule::FutureUpdatedAt,
                Severity::Warning,
                "updated_at",
                "Updated timestamp is in the future",
            ));
        }
        if task.updated_at < task.created_at {
            issues.push(issue(
                task,
                Rule::UpdatedBeforeCreated,
                Severity::Warning,
                "updated_at",
                "Updated timestamp is before created timestamp",
            ));
        }

        match task.due_date {
            None if task.priority == Priority::Critical => issues.push(issue(
                task,
                Rule::CriticalWithoutDueDate,
                Severity::Warning,
                "due_date",
                "Critical priority tasks should have a due date",
            )),
            None => {}
            Some(due) => {
                if due < now && !task.status.is_terminal() {
                    issues.push(issue(
                        task,
                        Rule::Overdue,
                        Severity::Warning,
                        "due_date",
                        format!("Task is overdue (due {})", due.format("%Y-%m-%d")),
                    ));
                }
                let horizon = Duration::try_days(self.rules.due_date_horizon_days)
                    .and_then(|days| now.checked_add_signed(days));
                if horizon.is_some_and(|horizon| due > horizon) {
                    issues.push(issue(
                        task,
                        Rule::DistantDueDate,
                        Severity::Info,
                        "due_date",
                        format!(
                            "Due date is more than {} days away",
                            self.rules.due_date_horizon_days
                        ),
                    ));
                }
            }
        }
    }

    fn check_agent(&self, task: &Task, issues: &mut Vec<Issue>) {
        if task.agent.trim().is_empty() {
            return;
        }
        match self.directory.lookup(&task.agent) {
            None => issues.push(issue(
                task,
                Rule::UnknownAgent,
                Severity::Error,
                "agent",
                format!("Unknown agent '{}'", task.agent),
            )),
            Some(role) => {
                if self.directory.keyword_hits(role, &task.searchable_text()) == 0 {
                    issues.push(issue(
                        task,
                        Rule::AgentCapabilityMismatch,
                        Severity::Info,
                        "agent",
                        format!("Task content may not match agent capabilities of {role}"),
                    ));
                }
            }
        }
    }

    fn check_tags(&self, task: &Task, issues: &mut Vec<Issue>) {
        if task.tags.len() > self.rules.max_tags {
            issues.push(issue(
                task,
                Rule::TooManyTags,
                Severity::Warning,
                "tags",
                format!(
                    "Task has {} tags (max {})",
                    task.tags.len(),
                    self.rules.max_tags
                ),
            ));
        }
        if self.rules.allowed_tags.is_empty() {
            return;
        }
        for tag in &task.tags {
            if !self.rules.allowed_tags.contains(tag) {
                issues.push(issue(
                    task,
                    Rule::UnrecognizedTag,
                    Severity::Warning,
                    "tags",
                    format!("Tag '{tag}' is not in the allowed tag list"),
                ));
            }
        }
    }

    fn check_dependency_list(&self, task: &Task, issues: &mut Vec<Issue>) {
        let deps = &task.dependencies;
        if deps.len() > self.rules.max_dependencies {
            issues.push(issue(
                task,
                Rule::TooManyDependencies,
                Severity::Warning,
                "dependencies",
                format!(
                    "Task has {} dependencies (max {})",
                    deps.len(),
                    self.rules.max_dependencies
                ),
            ));
        }

        if !task.id.is_empty() && task.depends_on(&task.id) {
            issues.push(issue(
                task,
                Rule::SelfDependency,
                Severity::Error,
                "dependencies",
                "Task depends on itself",
            ));
        }

        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();
        for dep in deps {
            if !is_valid_id(dep) {
                issues.push(issue(
                    task,
                    Rule::InvalidDependencyId,
                    Severity::Error,
                    "dependencies",
                    format!("Dependency id '{dep}' is malformed"),
                ));
            }
            if !seen.insert(dep.as_str()) && reported.insert(dep.as_str()) {
                issues.push(issue(
                    task,
                    Rule::DuplicateDependency,
                    Severity::Warning,
                    "dependencies",
                    format!("Dependency '{dep}' is listed more than once"),
                ));
            }
        }
    }

    /// Flag overloaded agents, and idle directory roles, only when both
    /// exist at once: imbalance rather than raw load.
    fn check_workload(&self, set: &TaskSet, issues: &mut Vec<Issue>) {
        let mut active: BTreeMap<&str, usize> = BTreeMap::new();
        for task in set.iter() {
            if !task.status.is_terminal() && !task.agent.trim().is_empty() {
                *active.entry(task.agent.as_str()).or_default() += 1;
            }
        }

        let threshold = self.rules.workload_threshold;
        let overloaded = active
            .iter()
            .filter(|(_, count)| **count > threshold)
            .collect::<Vec<_>>();
        let idle = self
            .directory
            .roles()
            .filter(|role| !active.contains_key(role.as_str()))
            .collect::<Vec<_>>();

        if overloaded.is_empty() || idle.is_empty() {
            return;
        }

        for (agent, count) in overloaded {
            issues.push(Issue::system(
                Rule::AgentOverloaded,
                Severity::Warning,
                "agent",
                format!("Agent '{agent}' is overloaded with {count} active tasks (threshold {threshold})"),
            ));
        }
        for role in idle {
            issues.push(Issue::system(
                Rule::AgentIdle,
                Severity::Info,
                "agent",
                format!("Agent '{role}' has no active tasks"),
            ));
        }
    }
}

fn issue(
    task: &Task,
    rule: Rule,
    severity: Severity,
    field: &str,
    message: impl Into<String>,
) -> Issue {
    Issue::for_task(rule, severity, task.id.clone(), field, message)
}

fn check_effort(task: &Task, issues: &mut Vec<Issue>) {
    for (field, value) in [
        ("estimated_hours", task.estimated_hours),
        ("actual_hours", task.actual_hours),
    ] {
        if value.is_some_and(|hours| hours < 0.0) {
            issues.push(issue(
                task,
                Rule::NegativeEffort,
                Severity::Warning,
                field,
                format!("'{field}' must not be negative"),
            ));
        }
    }

    if let (Some(estimated), Some(actual)) = (task.estimated_hours, task.actual_hours) {
        if estimated > 0.0 && actual > estimated * 2.0 {
            issues.push(issue(
                task,
                Rule::EffortOverrun,
                Severity::Info,
                "actual_hours",
                format!("Actual effort {actual}h is more than twice the estimate {estimated}h"),
            ));
        }
    }
}

/// The dependency-status invariant: workable tasks need every direct
/// dependency complete. One issue per task, naming every pending dependency.
fn check_dependency_status(task: &Task, graph: &DependencyGraph, issues: &mut Vec<Issue>) {
    if !task.status.is_workable() || graph.is_satisfied(task) {
        return;
    }
    let pending = graph
        .pending_dependencies(task)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    issues.push(issue(
        task,
        Rule::UnsatisfiedDependencies,
        Severity::Error,
        "status",
        format!(
            "Task is {} but dependencies are not complete: {pending}",
            task.status
        ),
    ));
}

fn check_cycles(graph: &DependencyGraph, issues: &mut Vec<Issue>) {
    // single-node cycles are reported per task as self-dependencies
    for cycle in graph.find_cycles().into_iter().filter(|c| c.len() > 1) {
        let Some(first) = cycle.first() else {
            continue;
        };
        let path = cycle
            .iter()
            .chain(std::iter::once(first))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" -> ");
        issues.push(Issue::for_task(
            Rule::DependencyCycle,
            Severity::Error,
            first.clone(),
            "dependencies",
            format!("Circular dependency detected: {path}"),
        ));
    }
}

fn check_blocked_without_dependencies(set: &TaskSet, issues: &mut Vec<Issue>) {
    let stuck = set
        .iter()
        .filter(|t| t.status == TaskStatus::Blocked && t.dependencies.is_empty())
        .map(|t| t.id.as_str())
        .collect::<Vec<_>>();
    if stuck.is_empty() {
        return;
    }
    issues.push(Issue::system(
        Rule::BlockedWithoutDependencies,
        Severity::Warning,
        "status",
        format!("Blocked tasks with no dependencies: {}", stuck.join(", ")),
    ));
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tw_core::entities::Task;
    use tw_core::enums::TaskStatus;
    use tw_core::task_set::UnreadableRecord;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn task(id: &str, status: TaskStatus, deps: &[&str]) -> Task {
        let mut task = Task::new(
            id,
            "Implement the parser",
            "DEVELOPER",
            status,
            now() - Duration::days(2),
        );
        task.dependencies = deps.iter().map(|d| (*d).to_string()).collect();
        task
    }

    fn rules_of(issues: &[Issue]) -> Vec<Rule> {
        issues.iter().map(|i| i.rule).collect()
    }

    fn run_task(task: &Task) -> Vec<Issue> {
        let rules = ValidationConfig::default();
        let directory = AgentDirectory::builtin();
        let graph = DependencyGraph::build(&TaskSet::from_tasks([task.clone()]));
        Validator::new(&rules, &directory).validate_task(task, &graph, now())
    }

    fn run_system(tasks: Vec<Task>) -> ValidationReport {
        let rules = ValidationConfig::default();
        let directory = AgentDirectory::builtin();
        Validator::new(&rules, &directory).validate_system(&TaskSet::from_tasks(tasks), now())
    }

    #[test]
    fn clean_task_has_no_issues() {
        assert_eq!(run_task(&task("a", TaskStatus::Todo, &[])), Vec::new());
    }

    #[rstest]
    #[case::empty_title("title")]
    #[case::empty_agent("agent")]
    fn empty_required_field_is_an_error(#[case] field: &str) {
        let mut t = task("a", TaskStatus::Todo, &[]);
        match field {
            "title" => t.title = "  ".into(),
            _ => t.agent = String::new(),
        }
        let issues = run_task(&t);
        let missing = issues
            .iter()
            .filter(|i| i.rule == Rule::MissingField)
            .collect::<Vec<_>>();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].field, field);
        assert_eq!(missing[0].severity, Severity::Error);
    }

    #[rstest]
    #[case("api-gateway", true)]
    #[case("task_42", true)]
    #[case("has space", false)]
    #[case("slash/id", false)]
    #[case("", false)]
    fn id_pattern(#[case] id: &str, #[case] valid: bool) {
        assert_eq!(is_valid_id(id), valid);
    }

    #[test]
    fn future_timestamps_and_ordering_are_warnings() {
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.created_at = now() + Duration::hours(1);
        t.updated_at = now() - Duration::hours(1);
        assert_eq!(
            rules_of(&run_task(&t)),
            vec![Rule::FutureCreatedAt, Rule::UpdatedBeforeCreated]
        );
    }

    #[test]
    fn clock_skew_within_tolerance_is_accepted() {
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.created_at = now() + Duration::seconds(3);
        t.updated_at = t.created_at;
        assert!(run_task(&t).is_empty());
    }

    #[test]
    fn critical_without_due_date_warns_once_until_set() {
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.priority = Priority::Critical;

        let issues = run_task(&t);
        assert_eq!(rules_of(&issues), vec![Rule::CriticalWithoutDueDate]);
        assert_eq!(issues[0].field, "due_date");
        assert_eq!(issues[0].severity, Severity::Warning);

        t.due_date = Some(now() + Duration::days(7));
        assert!(run_task(&t).is_empty());
    }

    #[rstest]
    #[case(TaskStatus::Todo, -1, vec![Rule::Overdue])]
    #[case(TaskStatus::Complete, -1, vec![])]
    #[case(TaskStatus::Todo, 400, vec![Rule::DistantDueDate])]
    #[case(TaskStatus::Todo, 30, vec![])]
    fn due_date_rules(#[case] status: TaskStatus, #[case] days: i64, #[case] expected: Vec<Rule>) {
        let mut t = task("a", status, &[]);
        t.due_date = Some(now() + Duration::days(days));
        assert_eq!(rules_of(&run_task(&t)), expected);
    }

    #[test]
    fn out_of_range_offsets_skip_the_comparison() {
        let rules = ValidationConfig {
            future_tolerance_secs: 1_000_000_000_000_000,
            due_date_horizon_days: 1_000_000_000,
            ..ValidationConfig::default()
        };
        let directory = AgentDirectory::builtin();
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.created_at = now() + Duration::days(30);
        t.updated_at = t.created_at;
        t.due_date = Some(now() + Duration::days(3));
        let set = TaskSet::from_tasks([t]);

        let report = Validator::new(&rules, &directory).validate_system(&set, now());

        assert_eq!(report.by_rule(Rule::FutureCreatedAt).count(), 0);
        assert_eq!(report.by_rule(Rule::DistantDueDate).count(), 0);
    }

    #[rstest]
    #[case(Some(4.0), Some(9.0), vec![Rule::EffortOverrun])]
    #[case(Some(4.0), Some(8.0), vec![])]
    #[case(Some(-1.0), None, vec![Rule::NegativeEffort])]
    #[case(None, Some(100.0), vec![])]
    fn effort_rules(
        #[case] estimated: Option<f64>,
        #[case] actual: Option<f64>,
        #[case] expected: Vec<Rule>,
    ) {
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.estimated_hours = estimated;
        t.actual_hours = actual;
        assert_eq!(rules_of(&run_task(&t)), expected);
    }

    #[test]
    fn todo_with_pending_dependency_yields_one_status_error() {
        let report = run_system(vec![
            task("a", TaskStatus::Pending, &[]),
            task("b", TaskStatus::Todo, &["a"]),
        ]);
        let errors = report.for_task("b").collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "status");
        assert_eq!(errors[0].severity, Severity::Error);
        assert_eq!(
            errors[0].message,
            "Task is todo but dependencies are not complete: a (pending)"
        );
    }

    #[test]
    fn one_level_satisfaction_trusts_complete_dependency() {
        // b is complete although its own dependency a is not; c is not flagged
        let report = run_system(vec![
            task("a", TaskStatus::Pending, &[]),
            task("b", TaskStatus::Complete, &["a"]),
            task("c", TaskStatus::InProgress, &["b"]),
        ]);
        assert_eq!(report.by_rule(Rule::UnsatisfiedDependencies).count(), 0);
    }

    #[test]
    fn unknown_agent_is_an_error_and_alias_is_not_canonical() {
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.agent = "CODEFORGE".into();
        let issues = run_task(&t);
        assert_eq!(rules_of(&issues), vec![Rule::UnknownAgent]);
        assert_eq!(issues[0].message, "Unknown agent 'CODEFORGE'");
    }

    #[test]
    fn content_without_agent_keywords_is_informational() {
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.agent = "SECURITY".into();
        let issues = run_task(&t);
        assert_eq!(rules_of(&issues), vec![Rule::AgentCapabilityMismatch]);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn tag_rules() {
        let mut t = task("a", TaskStatus::Todo, &[]);
        t.tags = (0..6).map(|i| format!("t{i}")).collect();
        assert_eq!(rules_of(&run_task(&t)), vec![Rule::TooManyTags]);

        let rules = ValidationConfig {
            allowed_tags: vec!["api".into()],
            ..ValidationConfig::default()
        };
        let directory = AgentDirectory::builtin();
        t.tags = vec!["api".into(), "misc".into()];
        let graph = DependencyGraph::build(&TaskSet::new());
        let issues = Validator::new(&rules, &directory).validate_task(&t, &graph, now());
        assert_eq!(rules_of(&issues), vec![Rule::UnrecognizedTag]);
        assert!(issues[0].message.contains("misc"));
    }

    #[test]
    fn dependency_list_rules() {
        let t = task("a", TaskStatus::Pending, &["a", "b", "b", "b", "bad id"]);
        assert_eq!(
            rules_of(&run_task(&t)),
            vec![
                Rule::SelfDependency,
                Rule::DuplicateDependency,
                Rule::InvalidDependencyId
            ]
        );
    }

    #[test]
    fn missing_dependencies_reported_per_reference() {
        let report = run_system(vec![task("a", TaskStatus::Pending, &["x", "y"])]);
        let messages = report
            .by_rule(Rule::MissingDependency)
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec!["Dependency 'x' does not exist", "Dependency 'y' does not exist"]
        );
    }

    #[test]
    fn cycle_is_reported_with_path() {
        let report = run_system(vec![
            task("a", TaskStatus::Pending, &["b"]),
            task("b", TaskStatus::Pending, &["c"]),
            task("c", TaskStatus::Pending, &["a"]),
        ]);
        let cycles = report.by_rule(Rule::DependencyCycle).collect::<Vec<_>>();
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            cycles[0].message,
            "Circular dependency detected: a -> b -> c -> a"
        );
    }

    #[test]
    fn self_loop_is_not_double_reported_as_cycle() {
        let report = run_system(vec![task("a", TaskStatus::Pending, &["a"])]);
        assert_eq!(report.by_rule(Rule::DependencyCycle).count(), 0);
        assert_eq!(report.by_rule(Rule::SelfDependency).count(), 1);
    }

    #[test]
    fn blocked_without_dependencies_is_one_system_warning() {
        let report = run_system(vec![
            task("a", TaskStatus::Blocked, &[]),
            task("b", TaskStatus::Blocked, &[]),
        ]);
        let found = report
            .by_rule(Rule::BlockedWithoutDependencies)
            .collect::<Vec<_>>();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].task_id, None);
        assert_eq!(found[0].message, "Blocked tasks with no dependencies: a, b");
    }

    #[test]
    fn workload_imbalance_flags_overloaded_and_idle() {
        let tasks = (0..11)
            .map(|i| task(&format!("t{i:02}"), TaskStatus::Pending, &[]))
            .collect();
        let report = run_system(tasks);

        let overloaded = report.by_rule(Rule::AgentOverloaded).collect::<Vec<_>>();
        assert_eq!(overloaded.len(), 1);
        assert!(overloaded[0].message.starts_with("Agent 'DEVELOPER' is overloaded"));
        // every role except DEVELOPER is idle
        assert_eq!(report.by_rule(Rule::AgentIdle).count(), 12);
    }

    #[test]
    fn workload_at_threshold_is_fine() {
        let tasks = (0..10)
            .map(|i| task(&format!("t{i:02}"), TaskStatus::Pending, &[]))
            .collect();
        let report = run_system(tasks);
        assert_eq!(report.by_rule(Rule::AgentOverloaded).count(), 0);
        assert_eq!(report.by_rule(Rule::AgentIdle).count(), 0);
    }

    #[test]
    fn unreadable_records_become_errors() {
        let mut set = TaskSet::from_tasks([task("a", TaskStatus::Todo, &[])]);
        set.push_unreadable(UnreadableRecord {
            source: "tasks/todo/broken.md".into(),
            reason: "invalid YAML header".into(),
        });
        let rules = ValidationConfig::default();
        let directory = AgentDirectory::builtin();
        let report = Validator::new(&rules, &directory).validate_system(&set, now());

        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.issues[0].rule, Rule::UnreadableRecord);
        assert_eq!(report.issues[0].field, "record");
    }

    #[test]
    fn validate_splits_warnings_and_errors() {
        let mut t = task("a", TaskStatus::Todo, &["ghost"]);
        t.priority = Priority::Critical;
        let rules = ValidationConfig::default();
        let directory = AgentDirectory::builtin();
        let graph = DependencyGraph::build(&TaskSet::from_tasks([t.clone()]));
        let (warnings, errors) = Validator::new(&rules, &directory).validate(&t, &graph, now());

        assert_eq!(rules_of(&warnings), vec![Rule::CriticalWithoutDueDate]);
        assert_eq!(rules_of(&errors), vec![Rule::UnsatisfiedDependencies]);
    }
}
