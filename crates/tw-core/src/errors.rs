//! Cross-cutting error types for taskward.
//!
//! Validation findings are never errors: they are [`crate::issues::Issue`]
//! values. `CoreError` covers operations that refuse to proceed, such as an
//! illegal manual status change.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Task lookup returned no result.
    #[error("Task not found: {id}")]
    NotFound { id: String },

    /// A status transition was attempted that is not allowed.
    #[error("Invalid status transition for {id}: {from} -> {to}")]
    InvalidTransition { id: String, from: String, to: String },

    /// A move into a workable status while dependencies are incomplete.
    #[error("Cannot move {id} to {to}: dependencies not complete ({pending})")]
    DependenciesUnsatisfied {
        id: String,
        to: String,
        pending: String,
    },
}
