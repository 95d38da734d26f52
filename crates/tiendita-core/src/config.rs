use crate::app_config::AppConfig;
use crate::whatsapp::DEFAULT_COUNTRY_CALLING_CODE;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse or validate.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse or validate.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let raw_bind = or_default("TIENDITA_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = raw_bind
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "TIENDITA_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let log_level = or_default("TIENDITA_LOG_LEVEL", "info");
    let stores_path = PathBuf::from(or_default("TIENDITA_STORES_PATH", "./config/stores.yaml"));
    let data_dir = PathBuf::from(or_default("TIENDITA_DATA_DIR", "./data"));

    let country_calling_code = or_default(
        "TIENDITA_COUNTRY_CALLING_CODE",
        DEFAULT_COUNTRY_CALLING_CODE,
    );
    if country_calling_code.is_empty()
        || !country_calling_code.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ConfigError::InvalidEnvVar {
            var: "TIENDITA_COUNTRY_CALLING_CODE".to_string(),
            reason: format!("expected digits, got '{country_calling_code}'"),
        });
    }

    Ok(AppConfig {
        bind_addr,
        log_level,
        stores_path,
        data_dir,
        country_calling_code,
    })
}
