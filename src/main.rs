use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use briefing::app::AppContext;
use briefing::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::with_workers(cli.config, cli.workers)?;

    match cli.command {
        Commands::Serve { port, public } => {
            commands::serve(&ctx, port, &public).await?;
        }
        Commands::Feeds { json } => {
            commands::print_feeds(&ctx, json).await?;
        }
        Commands::Calendar { json } => {
            commands::print_calendar(&ctx, json).await?;
        }
    }

    Ok(())
}
