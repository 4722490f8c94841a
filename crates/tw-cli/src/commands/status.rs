use std::process::ExitCode;

use serde::Serialize;
use tw_core::enums::TaskStatus;
use tw_engine::lifecycle::transition;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatusArgs;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::persist::{load, save_changed};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StatusResponse {
    id: String,
    from: TaskStatus,
    to: TaskStatus,
    /// Blocked dependents moved to `todo` by this change.
    promoted: Vec<String>,
}

/// Handle `tw status`.
pub fn run(args: &StatusArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let response = change_status(args, ctx)?;
    if !flags.quiet {
        output(&response, flags.format)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn change_status(args: &StatusArgs, ctx: &AppContext) -> anyhow::Result<StatusResponse> {
    let to = parse_enum::<TaskStatus>(&args.status, "status")?;
    let mut set = load(&ctx.store)?;

    let outcome = transition(
        &mut set,
        &args.id,
        to,
        args.note.as_deref(),
        AppContext::now(),
    )?;

    let changed = std::iter::once(args.id.as_str())
        .chain(outcome.promoted.iter().map(String::as_str));
    save_changed(&ctx.store, &set, changed)?;

    Ok(StatusResponse {
        id: args.id.clone(),
        from: outcome.from,
        to: outcome.to,
        promoted: outcome.promoted,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tw_core::enums::TaskStatus;

    use super::{StatusArgs, change_status};
    use crate::commands::test_support::{ctx, write_task};

    fn args(id: &str, status: &str, note: Option<&str>) -> StatusArgs {
        StatusArgs {
            id: id.into(),
            status: status.into(),
            note: note.map(Into::into),
        }
    }

    #[test]
    fn completing_a_task_promotes_blocked_dependents() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_task(dir.path(), "in-progress", "a", "in_progress", "DEVELOPER", &[]);
        write_task(dir.path(), "blocked", "b", "blocked", "DEVELOPER", &["a"]);

        let response = change_status(&args("a", "complete", Some("shipped")), &ctx(dir.path()))
            .expect("status");

        assert_eq!(response.from, TaskStatus::InProgress);
        assert_eq!(response.to, TaskStatus::Complete);
        assert_eq!(response.promoted, vec!["b"]);
        let a = fs::read_to_string(dir.path().join("done/a.md")).expect("a moved to done");
        assert!(a.contains("shipped"));
        assert!(dir.path().join("todo/b.md").is_file());
        assert!(!dir.path().join("blocked/b.md").exists());
    }

    #[test]
    fn starting_work_with_pending_dependencies_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_task(dir.path(), "todo", "a", "todo", "DEVELOPER", &[]);
        write_task(dir.path(), "blocked", "b", "blocked", "DEVELOPER", &["a"]);

        let err = change_status(&args("b", "todo", None), &ctx(dir.path())).expect_err("refused");

        assert_eq!(
            err.to_string(),
            "Cannot move b to todo: dependencies not complete (a (todo))"
        );
        assert!(dir.path().join("blocked/b.md").is_file());
    }

    #[test]
    fn illegal_transition_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_task(dir.path(), "backlog", "a", "pending", "DEVELOPER", &[]);

        let err = change_status(&args("a", "complete", None), &ctx(dir.path()))
            .expect_err("refused");
        assert!(err.to_string().starts_with("Invalid status transition for a"));
    }

    #[test]
    fn unknown_status_name_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_task(dir.path(), "todo", "a", "todo", "DEVELOPER", &[]);

        let err = change_status(&args("a", "finished", None), &ctx(dir.path())).expect_err("bad");
        assert!(err.to_string().contains("invalid status 'finished'"));
    }
}
