use serde::{Deserialize, Serialize};

use tiendita_core::CartItem;

use crate::{JsonStorage, is_safe_key_segment};

/// Fixed schema key for the cart document. A layout change means a new
/// key (or a migration), not a version field.
pub const CART_SCHEMA_KEY: &str = "catalog_cart_v1";

/// On-disk shape of a cart: `{"items": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPayload {
    pub items: Vec<CartItem>,
}

/// Cart persistence for one visitor session of one store.
///
/// Passed explicitly to whoever orchestrates cart mutations; there is no
/// ambient cart singleton. Two sessions are fully independent, and two
/// handles on the same session last-write-win with no merge — the same
/// behavior two browser tabs had against shared local storage.
#[derive(Debug, Clone)]
pub struct CartStore {
    storage: JsonStorage,
    key: String,
}

impl CartStore {
    /// Handle for `session`'s cart in `store_slug`'s shop. Identifiers
    /// that could escape the storage root degrade to an unavailable
    /// handle; callers wanting to reject them instead should validate
    /// with [`is_safe_key_segment`] first.
    #[must_use]
    pub fn for_session(storage: JsonStorage, store_slug: &str, session: &str) -> Self {
        if !is_safe_key_segment(store_slug) || !is_safe_key_segment(session) {
            return Self {
                storage: JsonStorage::unavailable(),
                key: CART_SCHEMA_KEY.to_string(),
            };
        }

        Self {
            storage,
            key: format!("carts/{store_slug}/{session}/{CART_SCHEMA_KEY}"),
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.storage.is_available()
    }

    /// Current cart items; empty when the medium is unavailable, the
    /// document absent, or its payload malformed.
    #[must_use]
    pub fn read(&self) -> Vec<CartItem> {
        self.storage
            .read_json(&self.key, CartPayload::default())
            .items
    }

    /// Persist the full item list. Called after every mutation.
    pub fn write(&self, items: &[CartItem]) {
        self.storage.write_json(
            &self.key,
            &CartPayload {
                items: items.to_vec(),
            },
        );
    }
}
