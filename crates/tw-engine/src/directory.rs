//! Agent directory: canonical roles, their capability keywords, and the
//! migration path for identifiers that are not canonical.
//!
//! Resolution of a non-canonical identifier has two layers:
//! 1. exact match in the alias table (legacy agent names);
//! 2. keyword scoring of the task's title and description, where a role
//!    wins only with a strictly highest hit count. Zero hits or a tie fall
//!    back to the configured role.
//!
//! Both layers are pure: the same identifier and text always resolve to the
//! same role.

use std::collections::BTreeMap;

use tw_config::AgentsConfig;
use tw_core::entities::Task;
use tw_core::enums::AgentRole;
use tw_core::fixes::ResolutionMethod;

const LEGACY_ALIASES: &[(&str, AgentRole)] = &[
    ("ARCHAIOS_PRIME", AgentRole::Architect),
    ("AUTOSYNTH", AgentRole::Automation),
    ("BUILDFLOW", AgentRole::Devops),
    ("CODEFORGE", AgentRole::Developer),
    ("COMPLIANCE_SENTINEL", AgentRole::Reviewer),
    ("CONSENSUS_ENGINE", AgentRole::Manager),
    ("DesignSynth", AgentRole::Designer),
    ("ECOSENTRY", AgentRole::Security),
    ("EthosGolem", AgentRole::Analyst),
    ("FINANCEORACLE", AgentRole::Analyst),
    ("GOVERNANCE_ADVISOR", AgentRole::Manager),
    ("GRANT_WRANGLER", AgentRole::Manager),
    ("JurisMind", AgentRole::Analyst),
    ("LegalSentinel", AgentRole::Analyst),
    ("MemoryWeaver", AgentRole::Developer),
    ("NARRATIVE_WARDEN", AgentRole::Documenter),
    ("OpsMind", AgentRole::Devops),
    ("PERMIT_WATCHDOG", AgentRole::Security),
    ("RISK_DOCTOR", AgentRole::Analyst),
    ("ResearchOracle", AgentRole::Researcher),
    ("SCENARIO_SMITH", AgentRole::Analyst),
    ("SECSENTINEL", AgentRole::Security),
    ("SIM_ENGINEER", AgentRole::Developer),
    ("STAKEHOLDERVOICE", AgentRole::Manager),
    ("TASK_VERIFIER_REWRITER", AgentRole::Reviewer),
    ("TESTCRAFTERPRO", AgentRole::Tester),
    ("TRACE_SYNTHESIZER", AgentRole::Developer),
    ("TheArchitect", AgentRole::Architect),
];

fn builtin_keywords(role: AgentRole) -> &'static [&'static str] {
    match role {
        AgentRole::Analyst => &[
            "analysis",
            "analytics",
            "metrics",
            "text-processing",
            "task-generation",
            "document-analysis",
            "workflow-automation",
            "ai-collaboration",
        ],
        AgentRole::Architect => &[
            "architecture",
            "branding",
            "naming",
            "cli-design",
            "market-analysis",
        ],
        AgentRole::Automation => &["automation", "epics", "phases", "hierarchy", "display"],
        AgentRole::DemoAgent => &[
            "demos",
            "examples",
            "use-cases",
            "portfolio-enhancement",
        ],
        AgentRole::Designer => &["design", "ui", "ux", "interface", "visual"],
        AgentRole::Developer => &[
            "implement",
            "develop",
            "code",
            "build",
            "programming",
            "software",
        ],
        AgentRole::Devops => &["deploy", "ops", "ci/cd", "pipeline", "infrastructure"],
        AgentRole::Documenter => &["documentation", "technical-writing", "api-docs", "guide"],
        AgentRole::Manager => &[
            "plan",
            "coordinate",
            "roadmap",
            "stakeholder",
            "governance",
            "budget",
        ],
        AgentRole::Researcher => &["research", "investigate", "survey", "evaluate"],
        AgentRole::Reviewer => &["review", "compliance", "audit", "verify"],
        AgentRole::Security => &[
            "security",
            "vulnerability",
            "permission",
            "threat",
            "encryption",
        ],
        AgentRole::Tester => &[
            "testing",
            "quality-assurance",
            "reliability",
            "pytest",
            "coverage",
        ],
    }
}

/// Where a non-canonical agent identifier should be migrated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub role: AgentRole,
    pub method: ResolutionMethod,
}

#[derive(Debug, Clone)]
pub struct AgentDirectory {
    keywords: BTreeMap<AgentRole, Vec<String>>,
    aliases: BTreeMap<String, AgentRole>,
    fallback: AgentRole,
}

impl Default for AgentDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AgentDirectory {
    /// Built-in roles, keywords, and legacy aliases, falling back to
    /// `DEVELOPER`.
    #[must_use]
    pub fn builtin() -> Self {
        let keywords = AgentRole::ALL
            .into_iter()
            .map(|role| {
                let words = builtin_keywords(role)
                    .iter()
                    .map(|w| (*w).to_string())
                    .collect();
                (role, words)
            })
            .collect();
        let aliases = LEGACY_ALIASES
            .iter()
            .map(|(alias, role)| ((*alias).to_string(), *role))
            .collect();

        Self {
            keywords,
            aliases,
            fallback: AgentRole::Developer,
        }
    }

    /// Built-in directory with project overrides applied: configured aliases
    /// are merged over the legacy table, configured keyword lists replace the
    /// built-in list for that role.
    #[must_use]
    pub fn from_config(config: &AgentsConfig) -> Self {
        let mut directory = Self::builtin();
        for (alias, role) in &config.aliases {
            directory.aliases.insert(alias.clone(), *role);
        }
        for (role, words) in &config.keywords {
            let words = words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
            directory.keywords.insert(*role, words);
        }
        directory.fallback = config.fallback;
        directory
    }

    #[must_use]
    pub const fn fallback(&self) -> AgentRole {
        self.fallback
    }

    /// The canonical role named by `identifier`, if it is one.
    #[must_use]
    pub fn lookup(&self, identifier: &str) -> Option<AgentRole> {
        AgentRole::from_identifier(identifier)
    }

    /// Capability keywords of a recognized agent; `None` for anything that is
    /// not a canonical role identifier, aliases included.
    ///
    /// Use [`Self::suggest_migration`] to map an alias or unknown identifier
    /// onto a role.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<&[String]> {
        self.lookup(identifier).map(|role| self.capabilities(role))
    }

    #[must_use]
    pub fn capabilities(&self, role: AgentRole) -> &[String] {
        self.keywords.get(&role).map_or(&[], Vec::as_slice)
    }

    /// Roles known to the directory, in canonical order.
    pub fn roles(&self) -> impl Iterator<Item = AgentRole> + '_ {
        self.keywords.keys().copied()
    }

    /// Number of `role` keywords occurring as substrings of `text`.
    /// `text` is expected to be lower-cased already.
    #[must_use]
    pub fn keyword_hits(&self, role: AgentRole, text: &str) -> usize {
        self.capabilities(role)
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count()
    }

    /// Pick a role from content alone.
    #[must_use]
    pub fn score_content(&self, text: &str) -> Migration {
        let text = text.to_lowercase();
        let mut best: Option<(AgentRole, usize)> = None;
        let mut tied = false;

        for role in self.roles() {
            let hits = self.keyword_hits(role, &text);
            if hits == 0 {
                continue;
            }
            match best {
                Some((_, top)) if hits < top => {}
                Some((_, top)) if hits == top => tied = true,
                _ => {
                    best = Some((role, hits));
                    tied = false;
                }
            }
        }

        match best {
            Some((role, _)) if !tied => Migration {
                role,
                method: ResolutionMethod::ContentScore,
            },
            _ => Migration {
                role: self.fallback,
                method: ResolutionMethod::Fallback,
            },
        }
    }

    /// Migration target for a task whose agent is not a canonical role.
    #[must_use]
    pub fn suggest_migration(&self, identifier: &str, task: &Task) -> Migration {
        if let Some(role) = self.aliases.get(identifier) {
            return Migration {
                role: *role,
                method: ResolutionMethod::ExactMatch,
            };
        }
        self.score_content(&task.searchable_text())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use tw_core::enums::TaskStatus;

    use super::*;

    fn task_with(title: &str, description: &str) -> Task {
        let mut task = Task::new("t-1", title, "UNKNOWN_X", TaskStatus::Todo, Utc::now());
        task.description = description.to_string();
        task
    }

    #[test]
    fn canonical_identifiers_resolve_to_capabilities() {
        let directory = AgentDirectory::builtin();
        let caps = directory.resolve("TESTER").expect("TESTER is canonical");
        assert!(caps.iter().any(|c| c == "pytest"));
    }

    #[test]
    fn aliases_are_not_recognized_agents() {
        let directory = AgentDirectory::builtin();
        assert!(directory.resolve("CODEFORGE").is_none());
        assert!(directory.lookup("developer").is_none());
    }

    #[test]
    fn unresolved_identifiers_migrate_to_a_resolvable_role() {
        let directory = AgentDirectory::builtin();
        let task = task_with("Write the release notes", "");
        for identifier in ["CODEFORGE", "UNKNOWN_X"] {
            assert!(directory.resolve(identifier).is_none());
            let migration = directory.suggest_migration(identifier, &task);
            assert!(directory.resolve(migration.role.as_str()).is_some());
        }
    }

    #[test]
    fn codeforge_migrates_deterministically() {
        let task = task_with("Write the release notes", "");
        let first = AgentDirectory::builtin().suggest_migration("CODEFORGE", &task);
        for _ in 0..10 {
            let again = AgentDirectory::builtin().suggest_migration("CODEFORGE", &task);
            assert_eq!(again, first);
        }
        assert_eq!(
            first,
            Migration {
                role: AgentRole::Developer,
                method: ResolutionMethod::ExactMatch
            }
        );
    }

    #[rstest]
    #[case("Deploy the service", "set up the release pipeline", AgentRole::Devops)]
    #[case("Implement parser", "write the code for tokens", AgentRole::Developer)]
    #[case("Security audit prep", "fix the vulnerability and threat model", AgentRole::Security)]
    #[case("Raise pytest coverage", "", AgentRole::Tester)]
    fn content_scoring_picks_strict_winner(
        #[case] title: &str,
        #[case] description: &str,
        #[case] expected: AgentRole,
    ) {
        let migration =
            AgentDirectory::builtin().suggest_migration("UNKNOWN_X", &task_with(title, description));
        assert_eq!(migration.role, expected);
        assert_eq!(migration.method, ResolutionMethod::ContentScore);
    }

    #[test]
    fn zero_hits_use_fallback() {
        let migration =
            AgentDirectory::builtin().suggest_migration("UNKNOWN_X", &task_with("Lunch", "sandwiches"));
        assert_eq!(
            migration,
            Migration {
                role: AgentRole::Developer,
                method: ResolutionMethod::Fallback
            }
        );
    }

    #[test]
    fn ties_use_fallback() {
        // one hit each for DESIGNER ("visual") and TESTER ("coverage")
        let migration = AgentDirectory::builtin()
            .suggest_migration("UNKNOWN_X", &task_with("Visual", "coverage"));
        assert_eq!(migration.method, ResolutionMethod::Fallback);
    }

    #[test]
    fn config_overrides_aliases_keywords_and_fallback() {
        let mut config = AgentsConfig {
            fallback: AgentRole::Analyst,
            ..AgentsConfig::default()
        };
        config.aliases.insert("OPS_BOT".into(), AgentRole::Devops);
        config
            .keywords
            .insert(AgentRole::Tester, vec!["  Regression ".into()]);

        let directory = AgentDirectory::from_config(&config);

        assert_eq!(
            directory
                .suggest_migration("OPS_BOT", &task_with("anything", ""))
                .role,
            AgentRole::Devops
        );
        assert_eq!(directory.capabilities(AgentRole::Tester), ["regression"]);
        assert_eq!(
            directory
                .suggest_migration("NOPE", &task_with("Lunch", ""))
                .role,
            AgentRole::Analyst
        );
        // built-in aliases survive
        assert_eq!(
            directory
                .suggest_migration("CODEFORGE", &task_with("x", ""))
                .role,
            AgentRole::Developer
        );
    }
}
