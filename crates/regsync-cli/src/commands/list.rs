use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regsync list`.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let project = AppContext::project(Some(args.project.as_str()), "", "project")?;
    let documents = ctx
        .register
        .list_documents(&project, args.query.as_deref())
        .await?;
    output(&documents, flags.format)
}
