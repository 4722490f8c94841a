use std::process::ExitCode;

use tw_core::entities::Task;
use tw_core::errors::CoreError;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AddNoteArgs;
use crate::commands::shared::persist::{load, save_changed};
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw add-note`.
pub fn run(args: &AddNoteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let task = add_note(args, ctx)?;
    if !flags.quiet {
        output(&task, flags.format)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn add_note(args: &AddNoteArgs, ctx: &AppContext) -> anyhow::Result<Task> {
    let text = args.text.trim();
    if text.is_empty() {
        anyhow::bail!("note text must not be empty");
    }

    let mut set = load(&ctx.store)?;
    let task = set
        .get_mut(&args.id)
        .ok_or_else(|| CoreError::NotFound { id: args.id.clone() })?;
    task.append_note(AppContext::now(), text);
    let task = task.clone();

    save_changed(&ctx.store, &set, [args.id.as_str()])?;
    Ok(task)
}
