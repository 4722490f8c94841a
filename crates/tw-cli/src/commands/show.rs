use std::process::ExitCode;

use serde::Serialize;
use tw_core::entities::Task;
use tw_core::errors::CoreError;
use tw_core::issues::Issue;

use crate::cli::root_commands::ShowArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::persist::load;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ShowResponse {
    task: Task,
    issues: Vec<Issue>,
}

/// Handle `tw show`.
pub fn run(args: &ShowArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let response = show(args, ctx)?;
    match flags.format {
        OutputFormat::Table => {
            output(&response.task, flags.format)?;
            println!();
            output(&response.issues, flags.format)?;
        }
        OutputFormat::Json | OutputFormat::Raw => output(&response, flags.format)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show(args: &ShowArgs, ctx: &AppContext) -> anyhow::Result<ShowResponse> {
    let set = load(&ctx.store)?;
    let report = ctx.engine.validate_system(&set, AppContext::now());
    let issues: Vec<Issue> = report
        .issues
        .into_iter()
        .filter(|issue| issue.concerns(&args.id))
        .collect();

    let task = set
        .get(&args.id)
        .cloned()
        .ok_or_else(|| CoreError::NotFound { id: args.id.clone() })?;
    Ok(ShowResponse { task, issues })
}
