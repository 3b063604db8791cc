mod api;
mod cli;
mod db;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "props-hub")]
#[command(about = "A player props analytics backend for NBA/WNBA betting lines")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// List upcoming matchups
    Matchups,
    /// Show the value overview for one matchup
    Props {
        #[arg(short, long)]
        game: String,
        #[arg(long, default_value = "Points")]
        prop_type: String,
        #[arg(long, default_value = "last_5_avg")]
        metric: String,
    },
    /// Show one player's baseline summary
    Player {
        #[arg(short, long)]
        name: String,
        #[arg(long, default_value = "2025")]
        season: String,
        #[arg(long, default_value = "Regular Season")]
        season_type: String,
    },
    /// Initialize the database
    InitDb,
    /// Load deterministic sample data
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting props-hub API server on port {}", port);
            api::serve(port).await?;
        }
        Some(Commands::Matchups) => {
            cli::list_matchups().await?;
        }
        Some(Commands::Props {
            game,
            prop_type,
            metric,
        }) => {
            cli::show_props(&game, &prop_type, &metric).await?;
        }
        Some(Commands::Player {
            name,
            season,
            season_type,
        }) => {
            cli::show_player(&name, &season, &season_type).await?;
        }
        Some(Commands::InitDb) => {
            tracing::info!("Initializing database...");
            db::init_database().await?;
        }
        Some(Commands::Seed) => {
            cli::seed().await?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting props-hub API server on port 3000");
            api::serve(3000).await?;
        }
    }

    Ok(())
}
