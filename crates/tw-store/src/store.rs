//! Directory-per-status task store.
//!
//! ```text
//! <root>/
//!   backlog/       pending
//!   blocked/
//!   todo/
//!   in-progress/
//!   done/          complete
//!   cancelled/
//! ```
//!
//! A task lives in `<root>/<status dir>/<id>.md`. The directory is the
//! authority for a header without `status`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tw_core::entities::Task;
use tw_core::enums::TaskStatus;
use tw_core::task_set::{TaskSet, UnreadableRecord};

use crate::document::{self, FileContext};
use crate::error::StoreError;

const EXTENSION: &str = "md";

/// Directory name for a status.
#[must_use]
pub const fn status_dir(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "backlog",
        TaskStatus::Blocked => "blocked",
        TaskStatus::Todo => "todo",
        TaskStatus::InProgress => "in-progress",
        TaskStatus::Complete => "done",
        TaskStatus::Cancelled => "cancelled",
    }
}

/// Load and persist tasks. The engine only ever sees the [`TaskSet`].
pub trait TaskRepository {
    /// Read every task. Files that cannot be parsed are returned as
    /// unreadable records on the set, not as errors.
    ///
    /// # Errors
    ///
    /// Fails only when the store as a whole cannot be read.
    fn load_all(&self) -> Result<TaskSet, StoreError>;

    /// Write one task, replacing any earlier copy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the task cannot be written.
    fn save(&self, task: &Task) -> Result<PathBuf, StoreError>;
}

#[derive(Debug, Clone)]
pub struct FsTaskStore {
    root: PathBuf,
}

impl FsTaskStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a task with this status and id belongs.
    #[must_use]
    pub fn path_for(&self, status: TaskStatus, id: &str) -> PathBuf {
        self.root
            .join(status_dir(status))
            .join(format!("{id}.{EXTENSION}"))
    }

    /// Every existing file named after `id`, in status order.
    fn copies_of(&self, id: &str) -> Vec<PathBuf> {
        TaskStatus::ALL
            .into_iter()
            .map(|status| self.path_for(status, id))
            .filter(|path| path.is_file())
            .collect()
    }

    fn task_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
        let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_document(path: &Path, status: TaskStatus) -> Result<document::TaskDocument, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        document::parse(
            &content,
            &FileContext {
                stem,
                status,
                modified,
            },
        )
    }

    /// Body of the first existing copy that parses, if any.
    fn existing_body(copies: &[PathBuf]) -> String {
        copies
            .iter()
            .find_map(|path| {
                let content = fs::read_to_string(path).ok()?;
                let ctx = FileContext {
                    stem: "",
                    status: TaskStatus::Pending,
                    modified: Utc::now(),
                };
                document::parse(&content, &ctx).ok().map(|doc| doc.body)
            })
            .unwrap_or_default()
    }
}

impl TaskRepository for FsTaskStore {
    fn load_all(&self) -> Result<TaskSet, StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::MissingRoot(self.root.clone()));
        }

        let mut tasks = Vec::new();
        let mut unreadable = Vec::new();

        for status in TaskStatus::ALL {
            let dir = self.root.join(status_dir(status));
            if !dir.is_dir() {
                continue;
            }
            for path in Self::task_files(&dir)? {
                match Self::read_document(&path, status) {
                    Ok(doc) => tasks.push(doc.task),
                    Err(reason) => {
                        tracing::warn!(path = %path.display(), %reason, "skipping unreadable task file");
                        unreadable.push(UnreadableRecord {
                            source: path.display().to_string(),
                            reason,
                        });
                    }
                }
            }
        }

        let mut set = TaskSet::from_tasks(tasks);
        for record in unreadable {
            set.push_unreadable(record);
        }
        tracing::debug!(
            root = %self.root.display(),
            tasks = set.len(),
            unreadable = set.unreadable().len(),
            "tasks loaded"
        );
        Ok(set)
    }

    fn save(&self, task: &Task) -> Result<PathBuf, StoreError> {
        if task.id.is_empty()
            || task.id.starts_with('.')
            || task.id.contains(['/', '\\'])
        {
            return Err(StoreError::InvalidId(task.id.clone()));
        }

        let target = self.path_for(task.status, &task.id);
        let copies = self.copies_of(&task.id);
        let body = Self::existing_body(&copies);

        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        let content = document::render(task, &body)?;
        fs::write(&target, content).map_err(|e| StoreError::io(&target, e))?;

        for stale in copies.iter().filter(|path| **path != target) {
            fs::remove_file(stale).map_err(|e| StoreError::io(stale, e))?;
        }

        tracing::info!(task = %task.id, status = %task.status, path = %target.display(), "task saved");
        Ok(target)
    }
}
