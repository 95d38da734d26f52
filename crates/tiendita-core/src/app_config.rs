use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Tenant registry location.
    pub stores_path: PathBuf,
    /// Root of the durable document medium (carts and catalogs).
    pub data_dir: PathBuf,
    /// Calling code prefixed onto bare 10-digit merchant numbers.
    pub country_calling_code: String,
}
