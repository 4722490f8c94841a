use std::process::ExitCode;

use serde::Serialize;
use tw_core::entities::Task;
use tw_core::enums::{Priority, TaskStatus};

use crate::cli::root_commands::ListArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::persist::load;
use crate::context::AppContext;
use crate::output::output;

/// Compact row for table output.
#[derive(Debug, Serialize)]
struct TaskRow<'a> {
    id: &'a str,
    title: &'a str,
    status: TaskStatus,
    priority: Priority,
    agent: &'a str,
    dependencies: &'a [String],
}

impl<'a> From<&'a Task> for TaskRow<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: &task.id,
            title: &task.title,
            status: task.status,
            priority: task.priority,
            agent: &task.agent,
            dependencies: &task.dependencies,
        }
    }
}

/// Handle `tw list`.
pub fn run(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let status = args
        .status
        .as_deref()
        .map(|raw| parse_enum::<TaskStatus>(raw, "status"))
        .transpose()?;

    let set = load(&ctx.store)?;
    let tasks = filter(set.iter(), status, args.agent.as_deref());

    match flags.format {
        OutputFormat::Table => {
            let rows = tasks.into_iter().map(TaskRow::from).collect::<Vec<_>>();
            output(&rows, flags.format)?;
        }
        OutputFormat::Json | OutputFormat::Raw => output(&tasks, flags.format)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn filter<'a>(
    tasks: impl Iterator<Item = &'a Task>,
    status: Option<TaskStatus>,
    agent: Option<&str>,
) -> Vec<&'a Task> {
    tasks
        .filter(|task| status.is_none_or(|status| task.status == status))
        .filter(|task| agent.is_none_or(|agent| task.agent.eq_ignore_ascii_case(agent.trim())))
        .collect()
}
