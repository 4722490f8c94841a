use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate every task and print the report.
    Validate(ValidateArgs),
    /// Apply safe corrections for auto-fixable errors.
    AutoFix(AutoFixArgs),
    /// Move a task to another status.
    Status(StatusArgs),
    /// Append a note to a task.
    AddNote(AddNoteArgs),
    /// Promote blocked tasks whose dependencies are complete.
    AutoTransition,
    /// List tasks.
    List(ListArgs),
    /// Show one task with its validation issues.
    Show(ShowArgs),
}

impl Commands {
    /// Whether the command mutates the task directory.
    #[must_use]
    pub const fn requires_write_lock(&self) -> bool {
        match self {
            Self::AutoFix(args) => !args.dry_run,
            Self::Status(_) | Self::AddNote(_) | Self::AutoTransition => true,
            Self::Validate(_) | Self::List(_) | Self::Show(_) => false,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Only report issues concerning this task
    #[arg(long)]
    pub task_id: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AutoFixArgs {
    /// Print the fixes without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the validation pass after fixing
    #[arg(long)]
    pub no_revalidate: bool,
}

#[derive(Clone, Debug, Args)]
pub struct StatusArgs {
    /// Task ID
    pub id: String,
    /// New status (pending, blocked, todo, in_progress, complete, cancelled)
    pub status: String,
    /// Note recorded with the change
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AddNoteArgs {
    /// Task ID
    pub id: String,
    /// Note text
    pub text: String,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by agent identifier (case-insensitive)
    #[arg(long)]
    pub agent: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    /// Task ID
    pub id: String,
}
