use anyhow::bail;
use clap::Subcommand;

use tiendita_core::AppConfig;
use tiendita_store::{default_products, CatalogStore, JsonStorage};

#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Write the bundled demo catalog for a store
    Seed {
        /// Store slug from the registry
        #[arg(long)]
        store: String,

        /// Overwrite an existing catalog document
        #[arg(long)]
        force: bool,
    },
}

pub fn run(command: CatalogCommands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        CatalogCommands::Seed { store, force } => seed(config, &store, force),
    }
}

fn seed(config: &AppConfig, slug: &str, force: bool) -> anyhow::Result<()> {
    let stores = tiendita_core::load_stores(&config.stores_path)?;
    if stores.find(slug).is_none() {
        bail!("unknown store slug '{slug}'; run `tiendita-cli stores validate` to list them");
    }

    let storage = JsonStorage::open(&config.data_dir);
    if !storage.is_available() {
        bail!("data directory {} is not writable", config.data_dir.display());
    }

    let catalog = CatalogStore::for_store(storage, slug);
    if catalog.is_seeded() && !force {
        bail!("store '{slug}' already has a catalog; pass --force to overwrite it");
    }

    let products = default_products();
    catalog.write(&products);
    println!("seeded {} product(s) for '{slug}'", products.len());

    Ok(())
}
