use crate::cli::root_commands::ProjectArgs;
use crate::context::AppContext;

/// Handle `regsync generate`. Always prints the descriptor XML.
pub async fn handle(args: &ProjectArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let project = AppContext::project(Some(args.project.as_str()), "", "project")?;
    let template = ctx.register.generate(&project).await?;
    println!("{}", template.to_xml()?);
    Ok(())
}
