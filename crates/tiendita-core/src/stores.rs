//! Tenant registry: the store profiles served by this deployment.
//!
//! Profiles are declared in a YAML file and loaded once at startup;
//! within a request they are immutable input to the storefront.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_currency() -> String {
    "COP".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProfile {
    /// Account id of the owning merchant in the hosted backend, when
    /// the registry is synced from one.
    #[serde(default)]
    pub id: Option<String>,
    pub store_name: String,
    /// Merchant WhatsApp number. Free-form in the file; the loader
    /// normalizes it to bare local digits. May be empty — checkout is
    /// blocked for such stores, nothing else is.
    #[serde(default)]
    pub whatsapp: String,
    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Explicit URL slug; derived from the name when omitted.
    #[serde(default)]
    pub slug: Option<String>,
}

impl StoreProfile {
    /// The public URL segment for this store.
    #[must_use]
    pub fn slug(&self) -> String {
        if let Some(slug) = &self.slug {
            return slug.clone();
        }

        self.store_name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<StoreProfile>,
}

impl StoresFile {
    /// Look up a profile by its effective slug.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&StoreProfile> {
        self.stores.iter().find(|s| s.slug() == slug)
    }
}

/// Load, validate, and normalize the store registry from a YAML file.
///
/// WhatsApp numbers come back stripped to digits; empty ones stay empty.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut stores_file: StoresFile =
        serde_yaml::from_str(&content).map_err(ConfigError::StoresFileParse)?;

    validate_stores(&stores_file)?;

    for store in &mut stores_file.stores {
        store.whatsapp = store.whatsapp.chars().filter(char::is_ascii_digit).collect();
    }

    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for store in &stores_file.stores {
        if store.store_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if store.currency.len() != 3 || !store.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid currency code '{}'; expected three uppercase letters",
                store.store_name, store.currency
            )));
        }

        let lower_name = store.store_name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.store_name
            )));
        }

        let slug = store.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' produces an empty slug; set one explicitly",
                store.store_name
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid slug '{}'; use lowercase letters, digits, and dashes",
                store.store_name, slug
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store slug: '{}' (from store '{}')",
                slug, store.store_name
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
