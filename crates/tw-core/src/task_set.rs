//! The in-memory snapshot the engine validates and repairs.
//!
//! Tasks are keyed by id in a `BTreeMap`, so every pass over the set visits
//! tasks in ascending id order and produces reproducible output.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;

/// A record the loader could not turn into a [`Task`].
///
/// The validator reports each one as a terminal per-record error and runs no
/// further checks on it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnreadableRecord {
    /// Where the record came from (file path, or task id for duplicates).
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: BTreeMap<String, Task>,
    unreadable: Vec<UnreadableRecord>,
}

impl TaskSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from tasks in load order. A second task with an id
    /// already present is not inserted; it is recorded as unreadable.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut set = Self::new();
        for task in tasks {
            if set.tasks.contains_key(&task.id) {
                set.unreadable.push(UnreadableRecord {
                    source: task.id.clone(),
                    reason: format!("duplicate task id '{}'", task.id),
                });
                continue;
            }
            set.tasks.insert(task.id.clone(), task);
        }
        set
    }

    /// Insert or replace a task, returning the previous record with that id.
    pub fn insert(&mut self, task: Task) -> Option<Task> {
        self.tasks.insert(task.id.clone(), task)
    }

    pub fn push_unreadable(&mut self, record: UnreadableRecord) {
        self.unreadable.push(record);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Tasks in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    #[must_use]
    pub fn unreadable(&self) -> &[UnreadableRecord] {
        &self.unreadable
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
