use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => commands::run::handle(&args, &ctx, flags).await,
        Commands::Grade(args) => commands::grade::handle(&args, &ctx, flags).await,
        Commands::Serve(args) => commands::serve::handle(&args, ctx).await,
        Commands::Whoami => commands::whoami::handle(&ctx, flags).await,
    }
}
