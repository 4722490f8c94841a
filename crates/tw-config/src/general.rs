//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_tasks_root() -> String {
    String::from("tasks")
}

const fn default_revalidate_after_fix() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory holding the per-status task folders.
    #[serde(default = "default_tasks_root")]
    pub tasks_root: String,

    /// Whether `auto-fix` re-runs validation after applying fixes.
    #[serde(default = "default_revalidate_after_fix")]
    pub revalidate_after_fix: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tasks_root: default_tasks_root(),
            revalidate_after_fix: default_revalidate_after_fix(),
        }
    }
}
