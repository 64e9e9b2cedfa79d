mod search;

use clap::{Parser, Subcommand};
use hfl_core::Environment;
use tracing_subscriber::EnvFilter;

use crate::search::PhotoSize;

#[derive(Debug, Parser)]
#[command(name = "hfl-cli")]
#[command(about = "Find healthy food venues near a place")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Geocode a place and list nearby healthy food venues
    Search {
        /// Place name to search around (defaults to HFL_DEFAULT_PLACE)
        place: Option<String>,
        /// Print the final search state as JSON
        #[arg(long)]
        json: bool,
        /// Photo URL size, as WIDTHxHEIGHT
        #[arg(long, default_value = "300x300", value_parser = search::parse_photo_size)]
        photo_size: PhotoSize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("hfl-cli: run `hfl-cli search [PLACE]` to find venues");
        return Ok(());
    };

    // Loads `.env` before RUST_LOG is read below.
    let config = hfl_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(log_ansi(&config.env))
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match command {
        Commands::Search {
            place,
            json,
            photo_size,
        } => search::run_search(&config, place.as_deref(), json, photo_size).await,
    }
}

/// Colored log output is for local terminals only; test and production logs
/// are usually captured by something that does not render escape codes.
fn log_ansi(env: &Environment) -> bool {
    matches!(env, Environment::Development)
}
