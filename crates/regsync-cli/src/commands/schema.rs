use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProjectArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regsync schema`.
pub async fn handle(args: &ProjectArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let project = AppContext::project(Some(args.project.as_str()), "", "project")?;
    let schema = ctx.register.schema(&project).await?;
    output(&*schema, flags.format)
}
