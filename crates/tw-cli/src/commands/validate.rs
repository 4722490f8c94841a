use std::process::ExitCode;

use tw_core::errors::CoreError;
use tw_core::issues::ValidationReport;

use crate::cli::root_commands::ValidateArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::persist::load;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw validate`. Exits non-zero when the report holds an error.
pub fn run(args: &ValidateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let report = build_report(args, ctx)?;
    print_report(&report, flags.format)?;
    Ok(exit_code(&report))
}

fn build_report(args: &ValidateArgs, ctx: &AppContext) -> anyhow::Result<ValidationReport> {
    let set = load(&ctx.store)?;
    let report = ctx.engine.validate_system(&set, AppContext::now());

    let Some(id) = args.task_id.as_deref() else {
        return Ok(report);
    };
    if !set.contains(id) {
        return Err(CoreError::NotFound { id: id.into() }.into());
    }
    Ok(ValidationReport::from_issues(
        report.issues.into_iter().filter(|issue| issue.concerns(id)).collect(),
    ))
}

/// Tables show one row per issue with a count line underneath; JSON keeps
/// the full report shape.
pub fn print_report(report: &ValidationReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            output(&report.issues, format)?;
            let summary = report.summary;
            println!(
                "\n{} errors, {} warnings, {} infos",
                summary.errors, summary.warnings, summary.infos
            );
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(report, format),
    }
}

pub const fn exit_code(report: &ValidationReport) -> ExitCode {
    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
