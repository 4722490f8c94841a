//! Dependency graph over a task snapshot.
//!
//! An edge `A -> B` means "A depends on B". The graph copies ids, statuses,
//! and edges out of the [`TaskSet`] so callers can keep it while mutating
//! the set. Statuses go stale once the set changes; rebuild after any
//! status mutation that matters.

use std::collections::{BTreeMap, BTreeSet};

use tw_core::entities::Task;
use tw_core::enums::TaskStatus;
use tw_core::task_set::TaskSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// A direct dependency that keeps a task from being workable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDependency {
    pub id: String,
    /// `None` when the referenced task does not exist.
    pub status: Option<TaskStatus>,
}

impl std::fmt::Display for PendingDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status})", self.id),
            None => write!(f, "{} (missing)", self.id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    statuses: BTreeMap<String, TaskStatus>,
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn build(set: &TaskSet) -> Self {
        let mut graph = Self::default();
        for task in set.iter() {
            graph.statuses.insert(task.id.clone(), task.status);
            graph
                .edges
                .insert(task.id.clone(), task.dependencies.clone());
        }
        graph
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.statuses.contains_key(id)
    }

    #[must_use]
    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.statuses.get(id).copied()
    }

    /// Ids referenced by `task.dependencies` that are not in the snapshot.
    #[must_use]
    pub fn missing_dependencies(&self, task: &Task) -> BTreeSet<String> {
        task.dependencies
            .iter()
            .filter(|dep| !self.contains(dep))
            .cloned()
            .collect()
    }

    /// True iff every direct dependency is `complete`.
    ///
    /// Only one level is inspected. A dependency that is itself complete is
    /// taken at its word even if its own dependencies are not.
    #[must_use]
    pub fn is_satisfied(&self, task: &Task) -> bool {
        task.dependencies
            .iter()
            .all(|dep| self.status_of(dep) == Some(TaskStatus::Complete))
    }

    /// Direct dependencies that are not complete, in declaration order,
    /// without repeats.
    #[must_use]
    pub fn pending_dependencies(&self, task: &Task) -> Vec<PendingDependency> {
        let mut seen = BTreeSet::new();
        task.dependencies
            .iter()
            .filter(|dep| seen.insert(dep.as_str()))
            .filter_map(|dep| {
                let status = self.status_of(dep);
                (status != Some(TaskStatus::Complete)).then(|| PendingDependency {
                    id: dep.clone(),
                    status,
                })
            })
            .collect()
    }

    /// Ids of tasks that list `id` as a direct dependency, ascending.
    #[must_use]
    pub fn dependents(&self, id: &str) -> Vec<String> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.iter().any(|dep| dep == id))
            .map(|(task_id, _)| task_id.clone())
            .collect()
    }

    #[must_use]
    pub fn has_cycle(&self) -> bool {
        !self.find_cycles().is_empty()
    }

    /// Every cycle closed by a back edge during one depth-first sweep.
    ///
    /// Each cycle lists its nodes in dependency order starting from the node
    /// the back edge points to; the edge from the last node back to the first
    /// is implied. Traversal is iterative with three-state marking, roots in
    /// ascending id order and children in declaration order, so the output
    /// is deterministic. References to missing tasks are skipped.
    #[must_use]
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
        let mut cycles = Vec::new();

        for root in self.edges.keys() {
            if marks.contains_key(root.as_str()) {
                continue;
            }

            // (node, index of the next child to visit)
            let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];
            marks.insert(root.as_str(), Mark::InProgress);

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let children = self.edges.get(node).map_or(&[][..], Vec::as_slice);

                let Some(child) = children.get(next) else {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                if !self.contains(child) {
                    continue;
                }
                match marks.get(child.as_str()) {
                    None => {
                        marks.insert(child.as_str(), Mark::InProgress);
                        stack.push((child.as_str(), 0));
                    }
                    Some(Mark::InProgress) => {
                        if let Some(start) = stack.iter().position(|(n, _)| *n == child.as_str()) {
                            let cycle = stack[start..]
                                .iter()
                                .map(|(n, _)| (*n).to_string())
                                .collect::<Vec<_>>();
                            tracing::debug!(cycle = %cycle.join(" -> "), "dependency cycle found");
                            cycles.push(cycle);
                        }
                    }
                    Some(Mark::Done) => {}
                }
            }
        }

        cycles
    }
}
