//! Store error types for tw-store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing task files.
///
/// A single file that fails to parse is not an error: it is surfaced as an
/// unreadable record on the loaded set.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The tasks root directory does not exist.
    #[error("Tasks directory not found: {0}")]
    MissingRoot(PathBuf),

    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Task header could not be serialized.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The task id cannot be used as a file name.
    #[error("Task id '{0}' cannot be used as a file name")]
    InvalidId(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
