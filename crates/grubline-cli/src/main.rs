mod browse;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use grubline_catalog::{CatalogClient, Fetcher};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "grubline")]
#[command(about = "Browse a food-delivery catalog from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List restaurants, optionally filtered by name
    Restaurants {
        /// Keep restaurants with a name word starting with this text
        #[arg(long)]
        query: Option<String>,
        /// Print normalized JSON instead of text cards
        #[arg(long)]
        json: bool,
    },
    /// Show one restaurant's menu
    Menu {
        /// Restaurant id as shown by `restaurants`
        id: String,
        /// Show item descriptions in full
        #[arg(long)]
        expand: bool,
        /// Print normalized JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: search, open menus, expand descriptions
    Browse,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = grubline_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = CatalogClient::from_config(&config)?;
    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "catalog client ready");

    match cli.command {
        Some(Commands::Restaurants { query, json }) => {
            commands::run_restaurants(&client, query.as_deref(), json).await?;
        }
        Some(Commands::Menu { id, expand, json }) => {
            return commands::run_menu(&client, &id, expand, json, config.description_limit).await;
        }
        Some(Commands::Browse) => {
            let fetcher = Fetcher::new(Arc::new(client.clone()));
            let session = browse::Session::new(&fetcher, client, config.description_limit);
            browse::run_browse(session).await?;
        }
        None => println!("nothing to do; try `grubline --help`"),
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
