//! # tw-store
//!
//! File-backed task storage: one markdown file per task with a YAML header,
//! grouped into one directory per status.
//!
//! The store is the I/O edge around the engine. It turns files into a
//! [`tw_core::task_set::TaskSet`] and writes changed tasks back; files it
//! cannot parse come back as unreadable records for the validator to report.

pub mod document;
mod error;
mod store;

pub use document::TaskDocument;
pub use error::StoreError;
pub use store::{FsTaskStore, TaskRepository, status_dir};
