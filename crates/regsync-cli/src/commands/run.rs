use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;
use crate::scenario::{self, ScenarioPlan};

/// Handle `regsync run`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let projects = ctx.config.require_projects()?;
    let source = AppContext::project(None, &projects.source, "projects.source")?;
    let destination = AppContext::project(None, &projects.destination, "projects.destination")?;
    let plan = ScenarioPlan::load(&ctx.config.scenario, source, destination)
        .await
        .context("failed to prepare scenario")?;

    let progress = Progress::new(flags.quiet);
    progress.done(&format!("Run {}", ctx.register.run()));
    match scenario::run(&ctx.register, &plan, &progress).await {
        Ok(report) => {
            progress.finish_clear();
            output(&report, flags.format)
        }
        Err(error) => {
            progress.finish_err(&format!("scenario failed: {error}"));
            Err(error.into())
        }
    }
}
