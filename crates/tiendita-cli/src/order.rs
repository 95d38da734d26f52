//! Dry-run order composition: see exactly what a customer's WhatsApp
//! message and deep link will look like for an ad-hoc cart.

use anyhow::{bail, Context};
use clap::Subcommand;
use percent_encoding::percent_decode_str;

use tiendita_core::{
    products_by_id,
    whatsapp::{build_whatsapp_link, compose_order_message},
    AppConfig, CartItem,
};
use tiendita_store::{CatalogStore, JsonStorage};

#[derive(Debug, Subcommand)]
pub enum OrderCommands {
    /// Compose the order message and deep link for an ad-hoc cart
    Preview {
        /// Store slug from the registry
        #[arg(long)]
        store: String,

        /// Cart entry as `product-id` or `product-id:quantity`; repeatable
        #[arg(long = "item")]
        items: Vec<String>,
    },
}

pub fn run(command: OrderCommands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        OrderCommands::Preview { store, items } => preview(config, &store, &items),
    }
}

fn preview(config: &AppConfig, slug: &str, raw_items: &[String]) -> anyhow::Result<()> {
    let stores = tiendita_core::load_stores(&config.stores_path)?;
    let Some(profile) = stores.find(slug) else {
        bail!("unknown store slug '{slug}'; run `tiendita-cli stores validate` to list them");
    };

    let items = parse_items(raw_items)?;
    let products = CatalogStore::for_store(JsonStorage::open(&config.data_dir), slug).read();
    let by_id = products_by_id(&products);

    let encoded =
        compose_order_message(&profile.store_name, &profile.currency, &items, &by_id);
    let message = percent_decode_str(&encoded)
        .decode_utf8()
        .context("composed message is not valid UTF-8 after decoding")?;

    println!("{message}");
    println!();

    if profile.whatsapp.is_empty() {
        println!("(no WhatsApp number configured for '{slug}'; checkout would be blocked)");
    } else {
        let url = build_whatsapp_link(&profile.whatsapp, &encoded, &config.country_calling_code);
        println!("{url}");
    }

    Ok(())
}

/// Parse `product-id[:quantity]` entries, collapsing repeated ids the
/// same way the cart engine would.
fn parse_items(raw_items: &[String]) -> anyhow::Result<Vec<CartItem>> {
    let mut items: Vec<CartItem> = Vec::new();

    for raw in raw_items {
        let (product_id, quantity) = match raw.split_once(':') {
            Some((id, qty)) => {
                let quantity: u32 = qty
                    .parse()
                    .with_context(|| format!("invalid quantity in '{raw}'"))?;
                (id, quantity)
            }
            None => (raw.as_str(), 1),
        };

        if product_id.is_empty() {
            bail!("empty product id in '{raw}'");
        }
        if quantity == 0 {
            bail!("quantity must be at least 1 in '{raw}'");
        }

        match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(existing) => existing.quantity += quantity,
            None => items.push(CartItem {
                product_id: product_id.to_string(),
                quantity,
            }),
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(entries: &[&str]) -> anyhow::Result<Vec<CartItem>> {
        let owned: Vec<String> = entries.iter().map(ToString::to_string).collect();
        parse_items(&owned)
    }

    #[test]
    fn bare_id_defaults_to_one() {
        let items = parse(&["p-001"]).expect("parse");
        assert_eq!(items[0].product_id, "p-001");
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn explicit_quantity_is_honored() {
        let items = parse(&["p-001:3"]).expect("parse");
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn repeated_ids_collapse() {
        let items = parse(&["p-001:2", "p-002", "p-001"]).expect("parse");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, "p-001");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(parse(&["p-001:0"]).is_err());
    }

    #[test]
    fn malformed_quantity_is_rejected() {
        assert!(parse(&["p-001:lots"]).is_err());
    }

    #[test]
    fn empty_product_id_is_rejected() {
        assert!(parse(&[":2"]).is_err());
    }
}
