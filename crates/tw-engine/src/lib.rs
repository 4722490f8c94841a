//! # tw-engine
//!
//! Pure computation over an in-memory [`TaskSet`]:
//! - [`graph::DependencyGraph`]: edges, satisfaction, cycle search
//! - [`lifecycle`]: manual status changes and auto-transition
//! - [`directory::AgentDirectory`]: canonical roles and agent migration
//! - [`validate::Validator`]: per-task and system-wide rules
//! - [`autofix::AutoFixer`]: the two corrections with an unambiguous remedy
//!
//! No I/O happens here. Callers load a snapshot, hand it in by reference,
//! and persist whatever comes back changed.

pub mod autofix;
pub mod directory;
pub mod graph;
pub mod lifecycle;
pub mod validate;

use chrono::{DateTime, Utc};
use tw_config::{TaskwardConfig, ValidationConfig};
use tw_core::fixes::FixReport;
use tw_core::issues::ValidationReport;
use tw_core::task_set::TaskSet;

pub use autofix::{AutoFixer, PlannedFix};
pub use directory::{AgentDirectory, Migration};
pub use graph::DependencyGraph;
pub use validate::Validator;

/// Validation thresholds plus the agent directory, built once per process
/// and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    rules: ValidationConfig,
    directory: AgentDirectory,
}

impl Engine {
    #[must_use]
    pub const fn new(rules: ValidationConfig, directory: AgentDirectory) -> Self {
        Self { rules, directory }
    }

    #[must_use]
    pub fn from_config(config: &TaskwardConfig) -> Self {
        Self::new(
            config.validation.clone(),
            AgentDirectory::from_config(&config.agents),
        )
    }

    #[must_use]
    pub const fn directory(&self) -> &AgentDirectory {
        &self.directory
    }

    #[must_use]
    pub const fn validator(&self) -> Validator<'_> {
        Validator::new(&self.rules, &self.directory)
    }

    #[must_use]
    pub const fn fixer(&self) -> AutoFixer<'_> {
        AutoFixer::new(self.validator())
    }

    #[must_use]
    pub fn validate_system(&self, set: &TaskSet, now: DateTime<Utc>) -> ValidationReport {
        self.validator().validate_system(set, now)
    }

    /// Apply every available fix to `set` and report what changed.
    pub fn auto_fix(&self, set: &mut TaskSet, now: DateTime<Utc>) -> FixReport {
        self.fixer().apply(set, now)
    }
}
