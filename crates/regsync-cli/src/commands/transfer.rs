use crate::cli::GlobalFlags;
use crate::cli::root_commands::TransferArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `regsync transfer`.
pub async fn handle(args: &TransferArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let projects = &ctx.config.projects;
    let source = AppContext::project(args.from.as_deref(), &projects.source, "projects.source")?;
    let destination =
        AppContext::project(args.to.as_deref(), &projects.destination, "projects.destination")?;
    if source == destination {
        anyhow::bail!("source and destination are both project {source}");
    }

    let progress = Progress::new(flags.quiet);
    progress.step(&format!("transferring {source} -> {destination}"));
    match ctx.register.transfer(&source, &destination).await {
        Ok(report) => {
            progress.done(&format!("Transferred {} document(s)", report.count()));
            progress.finish_clear();
            output(&report, flags.format)
        }
        Err(error) => {
            progress.finish_err(&format!("transfer failed: {error}"));
            Err(error.into())
        }
    }
}
