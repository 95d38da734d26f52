use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tiendita_core::Product;

use crate::{JsonStorage, is_safe_key_segment};

/// Fixed schema key for a store's product catalog document.
pub const PRODUCTS_SCHEMA_KEY: &str = "catalog_products_v1";

/// On-disk shape of a catalog: `{"products": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsPayload {
    pub products: Vec<Product>,
}

/// Catalog persistence for one store.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    storage: JsonStorage,
    key: String,
}

impl CatalogStore {
    #[must_use]
    pub fn for_store(storage: JsonStorage, store_slug: &str) -> Self {
        if !is_safe_key_segment(store_slug) {
            return Self {
                storage: JsonStorage::unavailable(),
                key: PRODUCTS_SCHEMA_KEY.to_string(),
            };
        }

        Self {
            storage,
            key: format!("products/{store_slug}/{PRODUCTS_SCHEMA_KEY}"),
        }
    }

    /// True when this store has a catalog document of its own (as
    /// opposed to serving the bundled demo catalog).
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.storage.contains(&self.key)
    }

    /// The store's products, falling back to the demo catalog when no
    /// document exists or the stored payload is malformed.
    #[must_use]
    pub fn read(&self) -> Vec<Product> {
        self.storage
            .read_json(
                &self.key,
                ProductsPayload {
                    products: default_products(),
                },
            )
            .products
    }

    /// Replace the catalog wholesale.
    pub fn write(&self, products: &[Product]) {
        self.storage.write_json(
            &self.key,
            &ProductsPayload {
                products: products.to_vec(),
            },
        );
    }
}

/// The demo catalog new stores start from.
#[must_use]
pub fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: "p-001".to_string(),
            name: "Producto 1".to_string(),
            price: Decimal::from(25_000),
            description: Some("Descripción corta del producto.".to_string()),
            image_url: Some(
                "https://images.unsplash.com/photo-1523275335684-37898b6baf30?auto=format&fit=crop&w=900&q=60"
                    .to_string(),
            ),
            images: vec![],
        },
        Product {
            id: "p-002".to_string(),
            name: "Producto 2".to_string(),
            price: Decimal::from(18_000),
            description: Some("Ideal para el día a día.".to_string()),
            image_url: Some(
                "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?auto=format&fit=crop&w=900&q=60"
                    .to_string(),
            ),
            images: vec![],
        },
        Product {
            id: "p-003".to_string(),
            name: "Producto 3".to_string(),
            price: Decimal::from(32_000),
            description: Some("Calidad premium.".to_string()),
            image_url: Some(
                "https://images.unsplash.com/photo-1526170367222-7f57f8f6c596?auto=format&fit=crop&w=900&q=60"
                    .to_string(),
            ),
            images: vec![],
        },
    ]
}
