//! Pure cart mutations.
//!
//! Every operation takes the current item sequence by reference and
//! returns a fresh `Vec`, so callers can rely on the returned value being
//! a distinct allocation to detect change. Unknown product ids are
//! no-ops, never errors.

use crate::catalog::CartItem;

/// Add one unit of `product_id` to the cart.
///
/// An entry already in the cart keeps its position and gains one unit;
/// otherwise a new entry with quantity 1 is appended at the end.
#[must_use]
pub fn add(items: &[CartItem], product_id: &str) -> Vec<CartItem> {
    if items.iter().any(|i| i.product_id == product_id) {
        return items
            .iter()
            .map(|i| {
                if i.product_id == product_id {
                    CartItem {
                        product_id: i.product_id.clone(),
                        quantity: i.quantity.saturating_add(1),
                    }
                } else {
                    i.clone()
                }
            })
            .collect();
    }

    let mut next = items.to_vec();
    next.push(CartItem {
        product_id: product_id.to_string(),
        quantity: 1,
    });
    next
}

/// Remove one unit of `product_id` from the cart.
///
/// A quantity of 1 (or, defensively, anything below it) deletes the
/// entry outright; quantities never decrement past 1 through this path.
/// An id not in the cart returns an unchanged copy.
#[must_use]
pub fn remove(items: &[CartItem], product_id: &str) -> Vec<CartItem> {
    let Some(existing) = items.iter().find(|i| i.product_id == product_id) else {
        return items.to_vec();
    };

    if existing.quantity <= 1 {
        return items
            .iter()
            .filter(|i| i.product_id != product_id)
            .cloned()
            .collect();
    }

    items
        .iter()
        .map(|i| {
            if i.product_id == product_id {
                CartItem {
                    product_id: i.product_id.clone(),
                    quantity: (i.quantity - 1).max(1),
                }
            } else {
                i.clone()
            }
        })
        .collect()
}

/// Discard every entry.
#[must_use]
pub fn clear() -> Vec<CartItem> {
    Vec::new()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
