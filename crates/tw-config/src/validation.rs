//! Thresholds for the validation rules.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One day; anything larger hides genuine clock errors.
pub const MAX_FUTURE_TOLERANCE_SECS: i64 = 86_400;

/// One hundred years.
pub const MAX_DUE_DATE_HORIZON_DAYS: i64 = 36_500;

const fn default_max_tags() -> usize {
    5
}

const fn default_max_title_length() -> usize {
    100
}

const fn default_max_description_length() -> usize {
    5000
}

const fn default_max_dependencies() -> usize {
    10
}

const fn default_workload_threshold() -> usize {
    10
}

const fn default_future_tolerance_secs() -> i64 {
    5
}

const fn default_due_date_horizon_days() -> i64 {
    365
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Maximum number of tags on one task.
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,

    /// Titles longer than this (in characters) are flagged.
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,

    /// Descriptions longer than this (in characters) are flagged.
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,

    /// Maximum number of direct dependencies on one task.
    #[serde(default = "default_max_dependencies")]
    pub max_dependencies: usize,

    /// An agent with more non-terminal tasks than this is overloaded.
    #[serde(default = "default_workload_threshold")]
    pub workload_threshold: usize,

    /// Clock skew allowed before a timestamp counts as "in the future".
    #[serde(default = "default_future_tolerance_secs")]
    pub future_tolerance_secs: i64,

    /// Due dates further out than this are flagged as advisory.
    #[serde(default = "default_due_date_horizon_days")]
    pub due_date_horizon_days: i64,

    /// Permitted tag vocabulary. Empty means any tag is accepted.
    #[serde(default)]
    pub allowed_tags: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_tags: default_max_tags(),
            max_title_length: default_max_title_length(),
            max_description_length: default_max_description_length(),
            max_dependencies: default_max_dependencies(),
            workload_threshold: default_workload_threshold(),
            future_tolerance_secs: default_future_tolerance_secs(),
            due_date_horizon_days: default_due_date_horizon_days(),
            allowed_tags: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Reject thresholds that would make every task fail.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("validation.max_tags", self.max_tags),
            ("validation.max_title_length", self.max_title_length),
            (
                "validation.max_description_length",
                self.max_description_length,
            ),
            ("validation.max_dependencies", self.max_dependencies),
            ("validation.workload_threshold", self.workload_threshold),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if !(0..=MAX_FUTURE_TOLERANCE_SECS).contains(&self.future_tolerance_secs) {
            return Err(ConfigError::InvalidValue {
                field: "validation.future_tolerance_secs".to_string(),
                reason: format!("must be between 0 and {MAX_FUTURE_TOLERANCE_SECS}"),
            });
        }
        if !(1..=MAX_DUE_DATE_HORIZON_DAYS).contains(&self.due_date_horizon_days) {
            return Err(ConfigError::InvalidValue {
                field: "validation.due_date_horizon_days".to_string(),
                reason: format!("must be between 1 and {MAX_DUE_DATE_HORIZON_DAYS}"),
            });
        }
        Ok(())
    }
}
