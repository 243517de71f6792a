mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use scrub_config::Config;
use scrub_storage::Storage;

use crate::commands::Context;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    // Completions need neither config nor storage
    if let cli::Commands::Completions { shell } = cli.command {
        commands::completions::handle(shell);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize storage once (creates connection pool and runs migrations)
    let db_path = cli.db.clone().or_else(|| config.database.clone());
    let storage = Storage::new(db_path).await?;

    let masked_ip = cli.masked_ip.clone().or_else(|| config.masked_ip.clone());
    let ctx = Context::new(storage, config, masked_ip);

    match cli.command {
        cli::Commands::Cleanup { stop_on_error } => {
            commands::cleanup::handle(&ctx, stop_on_error).await
        }
        cli::Commands::Enable => commands::flag::enable(&ctx).await,
        cli::Commands::Disable => commands::flag::disable(&ctx).await,
        cli::Commands::Delete => commands::flag::delete(&ctx).await,
        cli::Commands::Status => commands::flag::status(&ctx).await,
        cli::Commands::Activate { enabled } => commands::lifecycle::activate(&ctx, enabled).await,
        cli::Commands::Deactivate => commands::lifecycle::deactivate(),
        cli::Commands::Uninstall => commands::lifecycle::uninstall(&ctx).await,
        cli::Commands::Serve { host, port } => commands::serve::handle(ctx, host, port).await,
        cli::Commands::Completions { .. } => Ok(()),
    }
}
