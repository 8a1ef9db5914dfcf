//! Environment-driven server configuration.

use std::env;
use std::path::PathBuf;

/// Credentials for the Pinata pinning service.
#[derive(Debug, Clone)]
pub struct PinataConfig {
    pub api_key: String,
    pub api_secret: String,
}

/// Server configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// PostgreSQL connection string. Absent means the in-memory backend.
    pub database_url: Option<String>,
    /// Directory where uploaded artifact images are stored.
    pub uploads_dir: PathBuf,
    /// Pinning credentials. Absent means the upload relay is disabled.
    pub pinata: Option<PinataConfig>,
}

impl Config {
    pub fn from_env() -> Config {
        let bind_addr =
            env::var("HERITAGEVAULT_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let database_url = env::var("DATABASE_URL").ok();
        let uploads_dir =
            PathBuf::from(env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()));

        let pinata = match (
            env::var("PINATA_API_KEY").ok(),
            env::var("PINATA_API_SECRET").ok(),
        ) {
            (Some(api_key), Some(api_secret)) => Some(PinataConfig {
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Config {
            bind_addr,
            database_url,
            uploads_dir,
            pinata,
        }
    }
}
