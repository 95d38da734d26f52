use clap::Subcommand;

use tiendita_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum StoresCommands {
    /// Load and validate the registry, listing every store
    Validate,
}

pub fn run(command: StoresCommands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        StoresCommands::Validate => validate(config),
    }
}

fn validate(config: &AppConfig) -> anyhow::Result<()> {
    let stores = tiendita_core::load_stores(&config.stores_path)?;

    println!(
        "{} valid, {} store(s) configured:",
        config.stores_path.display(),
        stores.stores.len()
    );
    for store in &stores.stores {
        let whatsapp = if store.whatsapp.is_empty() {
            "not configured"
        } else {
            store.whatsapp.as_str()
        };
        println!(
            "  /{:<24} {} [{}] whatsapp: {}",
            store.slug(),
            store.store_name,
            store.currency,
            whatsapp
        );
    }

    Ok(())
}
