use thiserror::Error;

mod app_config;
pub mod cart;
mod catalog;
mod config;
mod money;
mod projection;
pub mod stores;
pub mod whatsapp;

pub use app_config::AppConfig;
pub use catalog::{products_by_id, CartItem, Product};
pub use config::{load_app_config, load_app_config_from_env};
pub use money::format_money;
pub use projection::{project, CartProjection, LineItem};
pub use stores::{load_stores, StoreProfile, StoresFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read stores file at {path}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse stores file")]
    StoresFileParse(#[from] serde_yaml::Error),
    #[error("invalid stores configuration: {0}")]
    Validation(String),
}
