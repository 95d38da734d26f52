//! Durable JSON document storage for carts and catalogs.
//!
//! The medium is a directory of small JSON documents, one per schema
//! key. Its contract is deliberately forgiving: reads of an absent or
//! malformed document return the caller's fallback, writes against an
//! unavailable medium are dropped with a log line, and nothing in this
//! crate ever returns an error to the caller. Whether the medium exists
//! at all is an explicit capability ([`JsonStorage::is_available`])
//! that hosts check up front, so "not yet loaded" and "loaded and
//! empty" stay distinguishable.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

mod cart;
mod catalog;

pub use cart::{CartPayload, CartStore, CART_SCHEMA_KEY};
pub use catalog::{default_products, CatalogStore, ProductsPayload, PRODUCTS_SCHEMA_KEY};

/// Handle over the durable document medium.
///
/// `open` degrades to an unavailable handle when the root cannot be
/// created; [`JsonStorage::unavailable`] constructs one directly, which
/// tests use to simulate environments without storage.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: Option<PathBuf>,
}

impl JsonStorage {
    /// Open the medium rooted at `root`, creating the directory if needed.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        match fs::create_dir_all(&root) {
            Ok(()) => Self { root: Some(root) },
            Err(e) => {
                tracing::warn!(path = %root.display(), error = %e, "storage root unavailable, all reads will fall back");
                Self { root: None }
            }
        }
    }

    /// A handle with no medium behind it: every read falls back, every
    /// write is dropped.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { root: None }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.root.is_some()
    }

    /// True when a document exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).is_some_and(|p| p.is_file())
    }

    /// Read the document under `key`, or `fallback` when the medium is
    /// unavailable, the key absent, or the payload malformed.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(path) = self.key_path(key) else {
            return fallback;
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return fallback,
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "malformed payload, using fallback");
                fallback
            }
        }
    }

    /// Rewrite the document under `key` in full.
    ///
    /// Write-through: callers invoke this after every mutation, there is
    /// no batching or flush step. Failures are logged and swallowed —
    /// a broken medium behaves like an absent one.
    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let Some(path) = self.key_path(key) else {
            return;
        };

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize payload, dropping write");
                return;
            }
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(key, error = %e, "failed to create storage path, dropping write");
                return;
            }
        }

        if let Err(e) = fs::write(&path, payload) {
            tracing::warn!(key, error = %e, "failed to persist payload, dropping write");
        }
    }

    fn key_path(&self, key: &str) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join(format!("{key}.json")))
    }
}

/// True for identifiers safe to embed in a storage key: non-empty
/// ASCII alphanumerics, dashes, and underscores. Anything else could
/// escape the medium's root.
#[must_use]
pub fn is_safe_key_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
