//! Derived view of a cart joined against the product catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{CartItem, Product};

/// A priced cart entry. Recomputed on every projection, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProjection {
    /// Priced lines in cart order; entries whose product no longer
    /// exists are omitted.
    pub line_items: Vec<LineItem>,
    /// Sum of line totals over resolvable entries only.
    pub total: Decimal,
    /// Sum of quantities over every entry, resolvable or not. The cart
    /// badge counts what the visitor added; the priced summary counts
    /// what the order will actually contain. Intentional asymmetry.
    pub count: u64,
}

/// Join cart entries against the catalog.
///
/// Entries referencing a product id absent from `products_by_id` are
/// silently dropped from `line_items` and `total` but still counted in
/// `count`. The stored cart is left untouched; dangling entries are a
/// display-time concern, not data to purge.
#[must_use]
pub fn project(items: &[CartItem], products_by_id: &HashMap<&str, &Product>) -> CartProjection {
    let mut line_items = Vec::new();
    let mut total = Decimal::ZERO;
    let mut count: u64 = 0;

    for item in items {
        count += u64::from(item.quantity);

        let Some(product) = products_by_id.get(item.product_id.as_str()) else {
            continue;
        };

        let line_total = product.price * Decimal::from(item.quantity);
        total += line_total;
        line_items.push(LineItem {
            product: (*product).clone(),
            quantity: item.quantity,
            unit_price: product.price,
            line_total,
        });
    }

    CartProjection {
        line_items,
        total,
        count,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "projection_test.rs"]
mod tests;
