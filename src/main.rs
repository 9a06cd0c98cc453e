mod client;
mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plancal_core::PlanCalConfig;

use crate::client::Client;
use crate::commands::add::AddArgs;
use crate::commands::calendar::CalendarArgs;
use crate::commands::delete::DeleteArgs;
use crate::commands::edit::EditArgs;
use crate::commands::list::ListArgs;

#[derive(Parser)]
#[command(name = "plancal")]
#[command(about = "Manage events, repeating series and reminders on a plancal server")]
struct Cli {
    /// Server URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events of a week or month, optionally filtered by a search term
    List(ListArgs),
    /// Show a week or month grid
    Calendar(CalendarArgs),
    /// Create an event, or a repeating series of events
    Add(AddArgs),
    /// Change an event, or every event in its series
    Edit(EditArgs),
    /// Delete an event, or its whole series
    Delete(DeleteArgs),
    /// Print notifications as events approach
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = PlanCalConfig::load()?;
    let client = Client::new(cli.server.as_deref().unwrap_or(&config.server_url));

    match cli.command {
        Commands::List(args) => commands::list::run(args, &client).await,
        Commands::Calendar(args) => commands::calendar::run(args, &client).await,
        Commands::Add(args) => commands::add::run(args, &client, &config).await,
        Commands::Edit(args) => commands::edit::run(args, &client, &config).await,
        Commands::Delete(args) => commands::delete::run(args, &client).await,
        Commands::Watch => commands::watch::run(client, &config).await,
    }
}
