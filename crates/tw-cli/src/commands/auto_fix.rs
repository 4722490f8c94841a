use std::collections::BTreeMap;
use std::process::ExitCode;

use serde::Serialize;
use tw_core::fixes::FixReport;
use tw_core::issues::{Issue, ReportSummary};
use tw_engine::autofix::apply_plan;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AutoFixArgs;
use crate::commands::shared::persist::{load, save_changed};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct AutoFixResponse {
    dry_run: bool,
    fixes: usize,
    /// Task id to `from -> to` descriptions.
    changes: BTreeMap<String, String>,
    saved: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    revalidation: Option<ReportSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    remaining_errors: Vec<Issue>,
}

/// Handle `tw auto-fix`. Exits non-zero when errors survive re-validation.
pub fn run(args: &AutoFixArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let response = fix(args, ctx)?;
    let failed = response.revalidation.is_some_and(|summary| summary.errors > 0);
    if !flags.quiet || failed {
        output(&response, flags.format)?;
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn fix(args: &AutoFixArgs, ctx: &AppContext) -> anyhow::Result<AutoFixResponse> {
    let mut set = load(&ctx.store)?;
    let now = AppContext::now();
    let plan = ctx.engine.fixer().plan(&set, now);

    if args.dry_run {
        let mut planned = FixReport::default();
        for entry in &plan {
            planned.record(entry.task_id.clone(), entry.fix.clone());
        }
        return Ok(AutoFixResponse {
            dry_run: true,
            fixes: planned.fix_count(),
            changes: planned.descriptions(),
            saved: Vec::new(),
            revalidation: None,
            remaining_errors: Vec::new(),
        });
    }

    let fixes = apply_plan(&mut set, plan, now);
    let saved = save_changed(&ctx.store, &set, fixes.task_ids())?;
    tracing::info!(tasks = saved.len(), fixes = fixes.fix_count(), "auto-fix saved");

    let revalidate = ctx.config.general.revalidate_after_fix && !args.no_revalidate;
    let report = revalidate.then(|| ctx.engine.validate_system(&set, now));
    let remaining_errors: Vec<Issue> = report
        .as_ref()
        .map(|report| report.errors().cloned().collect())
        .unwrap_or_default();

    Ok(AutoFixResponse {
        dry_run: false,
        fixes: fixes.fix_count(),
        changes: fixes.descriptions(),
        saved,
        revalidation: report.map(|report| report.summary),
        remaining_errors,
    })
}
