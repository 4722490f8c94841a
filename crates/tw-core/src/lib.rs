//! # tw-core
//!
//! Core types for taskward, shared by every other crate:
//! - The [`entities::Task`] record and its append-only note log
//! - Status, priority, severity, and agent role enums
//! - [`task_set::TaskSet`], the id-ordered snapshot the engine works on
//! - Validation issues and the ordered report
//! - Auto-fix change reports
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod fixes;
pub mod issues;
pub mod task_set;
