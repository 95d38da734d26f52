use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog entry as the storefront renders and persists it.
///
/// Field names serialize in camelCase to match the persisted catalog
/// payload (`{"products": [{"id": ..., "imageUrl": ...}]}`). Prices are
/// whole-unit amounts in the store's currency, never minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ordered gallery; the first entry is the primary image when
    /// `image_url` is absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// One cart entry: a product reference and how many of it.
///
/// The persisted layout is fixed as
/// `{"productId": string, "quantity": number}` with no version field.
/// A quantity of zero never exists in a stored cart; reaching zero
/// removes the entry instead (see [`crate::cart::remove`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Index a product list by id for cart joins.
///
/// Later duplicates win, matching how the original catalog lookup
/// collapsed repeated ids.
#[must_use]
pub fn products_by_id(products: &[Product]) -> HashMap<&str, &Product> {
    products.iter().map(|p| (p.id.as_str(), p)).collect()
}
