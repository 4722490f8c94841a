use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tw` binary.
#[derive(Debug, Parser)]
#[command(name = "tw", version, about = "taskward - task lifecycle validation and repair")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in the log)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Task directory (overrides general.tasks_root)
    #[arg(short, long, global = true)]
    pub root: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            root: self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["tw", "--format", "table", "--verbose", "auto-transition"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::AutoTransition));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["tw", "validate", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["tw", "--format", "xml", "validate"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["tw", "--root", "/tmp/tasks", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.root.as_deref(), Some("/tmp/tasks"));
    }

    #[test]
    fn status_takes_positional_id_and_status() {
        let cli = Cli::try_parse_from(["tw", "status", "api", "in_progress", "--note", "starting"])
            .expect("cli should parse");
        let Commands::Status(args) = cli.command else {
            panic!("expected status command");
        };
        assert_eq!(args.id, "api");
        assert_eq!(args.status, "in_progress");
        assert_eq!(args.note.as_deref(), Some("starting"));
    }

    #[test]
    fn only_mutating_commands_take_the_write_lock() {
        let lock = |args: &[&str]| {
            Cli::try_parse_from(args)
                .expect("cli should parse")
                .command
                .requires_write_lock()
        };
        assert!(lock(&["tw", "auto-fix"]));
        assert!(!lock(&["tw", "auto-fix", "--dry-run"]));
        assert!(lock(&["tw", "add-note", "api", "hello"]));
        assert!(!lock(&["tw", "validate", "--task-id", "api"]));
        assert!(!lock(&["tw", "show", "api"]));
    }
}
