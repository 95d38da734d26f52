mod catalog;
mod order;
mod stores;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tiendita-cli")]
#[command(about = "Tiendita operator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and validate the tenant registry
    Stores {
        #[command(subcommand)]
        command: stores::StoresCommands,
    },
    /// Manage per-store product catalogs
    Catalog {
        #[command(subcommand)]
        command: catalog::CatalogCommands,
    },
    /// Compose order messages without going through the HTTP API
    Order {
        #[command(subcommand)]
        command: order::OrderCommands,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = tiendita_core::load_app_config_from_env()?;

    match cli.command {
        Commands::Stores { command } => stores::run(command, &config),
        Commands::Catalog { command } => catalog::run(command, &config),
        Commands::Order { command } => order::run(command, &config),
    }
}
