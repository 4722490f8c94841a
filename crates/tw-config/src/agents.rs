//! Agent directory overrides.
//!
//! The built-in alias table and keyword lists live in the engine; this
//! section only carries what a project adds or replaces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tw_core::enums::AgentRole;

const fn default_fallback() -> AgentRole {
    AgentRole::Developer
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AgentsConfig {
    /// Role used when content scoring finds no hits or a tie.
    #[serde(default = "default_fallback")]
    pub fallback: AgentRole,

    /// Extra alias entries, merged over the built-in table.
    #[serde(default)]
    pub aliases: BTreeMap<String, AgentRole>,

    /// Per-role keyword lists replacing the built-in ones.
    #[serde(default)]
    pub keywords: BTreeMap<AgentRole, Vec<String>>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            aliases: BTreeMap::new(),
            keywords: BTreeMap::new(),
        }
    }
}
