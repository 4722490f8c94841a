use std::process::ExitCode;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Validate(args) => commands::validate::run(&args, ctx, flags),
        Commands::AutoFix(args) => commands::auto_fix::run(&args, ctx, flags),
        Commands::Status(args) => commands::status::run(&args, ctx, flags),
        Commands::AddNote(args) => commands::add_note::run(&args, ctx, flags),
        Commands::AutoTransition => commands::auto_transition::run(ctx, flags),
        Commands::List(args) => commands::list::run(&args, ctx, flags),
        Commands::Show(args) => commands::show::run(&args, ctx, flags),
    }
}
