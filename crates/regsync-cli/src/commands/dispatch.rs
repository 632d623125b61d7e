use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Run => commands::run::handle(ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, ctx, flags).await,
        Commands::List(args) => commands::list::handle(&args, ctx, flags).await,
        Commands::Generate(args) => commands::generate::handle(&args, ctx).await,
        Commands::Transfer(args) => commands::transfer::handle(&args, ctx, flags).await,
    }
}
