use anyhow::Context;
use tw_core::errors::CoreError;
use tw_core::task_set::TaskSet;
use tw_store::{FsTaskStore, TaskRepository};

/// Load every task under the store root.
pub fn load(store: &FsTaskStore) -> anyhow::Result<TaskSet> {
    store
        .load_all()
        .with_context(|| format!("failed to load tasks from {}", store.root().display()))
}

/// Write back the tasks named by `ids`; untouched tasks are left alone.
/// Returns the written paths.
pub fn save_changed<'a>(
    store: &FsTaskStore,
    set: &TaskSet,
    ids: impl IntoIterator<Item = &'a str>,
) -> anyhow::Result<Vec<String>> {
    ids.into_iter()
        .map(|id| -> anyhow::Result<String> {
            let task = set.get(id).ok_or_else(|| CoreError::NotFound { id: id.into() })?;
            let path = store
                .save(task)
                .with_context(|| format!("failed to save task '{id}'"))?;
            Ok(path.display().to_string())
        })
        .collect()
}
