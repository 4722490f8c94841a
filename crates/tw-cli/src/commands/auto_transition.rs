use std::collections::BTreeMap;
use std::process::ExitCode;

use serde::Serialize;
use tw_engine::lifecycle::auto_transition;

use crate::cli::GlobalFlags;
use crate::commands::shared::persist::{load, save_changed};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct AutoTransitionResponse {
    promoted: usize,
    changes: BTreeMap<String, String>,
}

/// Handle `tw auto-transition`.
pub fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let response = promote_ready(ctx)?;
    if !flags.quiet {
        output(&response, flags.format)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn promote_ready(ctx: &AppContext) -> anyhow::Result<AutoTransitionResponse> {
    let mut set = load(&ctx.store)?;
    let report = auto_transition(&mut set, AppContext::now());
    save_changed(&ctx.store, &set, report.task_ids())?;

    Ok(AutoTransitionResponse {
        promoted: report.fix_count(),
        changes: report.descriptions(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::promote_ready;
    use crate::commands::test_support::{ctx, write_task};

    #[test]
    fn only_satisfied_blocked_tasks_move() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_task(dir.path(), "done", "a", "complete", "DEVELOPER", &[]);
        write_task(dir.path(), "todo", "b", "todo", "DEVELOPER", &[]);
        write_task(dir.path(), "blocked", "ready", "blocked", "DEVELOPER", &["a"]);
        write_task(dir.path(), "blocked", "waiting", "blocked", "DEVELOPER", &["b"]);

        let response = promote_ready(&ctx(dir.path())).expect("auto-transition");

        assert_eq!(response.promoted, 1);
        assert_eq!(
            response.changes.get("ready").map(String::as_str),
            Some("blocked -> todo")
        );
        assert!(dir.path().join("todo/ready.md").is_file());
        assert!(dir.path().join("blocked/waiting.md").is_file());
    }
}
