//! # tw-config
//!
//! Layered configuration loading for taskward using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TASKWARD_*` prefix, `__` as separator)
//! 2. Project-level `.taskward/config.toml`
//! 3. User-level `~/.config/taskward/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TASKWARD_VALIDATION__MAX_TAGS` -> `validation.max_tags`,
//! `TASKWARD_AGENTS__FALLBACK` -> `agents.fallback`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use tw_config::TaskwardConfig;
//!
//! let config = TaskwardConfig::load_with_dotenv().expect("config");
//! println!("tasks live in {}", config.general.tasks_root);
//! ```

mod agents;
mod error;
mod general;
mod validation;

pub use agents::AgentsConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use validation::ValidationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskwardConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
}

impl TaskwardConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value is out
    /// of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".taskward/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TASKWARD_").split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.tasks_root.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "general.tasks_root".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        self.validation.validate()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskward").join("config.toml"))
    }
}
