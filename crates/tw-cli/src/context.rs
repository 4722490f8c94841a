use std::path::Path;

use chrono::{DateTime, Utc};
use tw_config::TaskwardConfig;
use tw_engine::Engine;
use tw_store::FsTaskStore;

/// Shared resources built once at startup.
pub struct AppContext {
    pub config: TaskwardConfig,
    pub store: FsTaskStore,
    pub engine: Engine,
}

impl AppContext {
    /// `root_override` comes from `--root` and wins over `general.tasks_root`.
    pub fn init(config: TaskwardConfig, root_override: Option<&str>) -> Self {
        let root = root_override.unwrap_or(&config.general.tasks_root);
        let store = FsTaskStore::new(root);
        let engine = Engine::from_config(&config);
        Self {
            config,
            store,
            engine,
        }
    }

    pub fn tasks_root(&self) -> &Path {
        self.store.root()
    }

    /// Wall-clock time for a command. Taken once per command so every
    /// timestamp it writes agrees.
    pub fn now() -> DateTime<Utc> {
        Utc::now()
    }
}
