//! Store connection configuration.
//!
//! Loaded from environment variables. The defaults are for local
//! development only; never ship them to a real deployment.

use std::env;

/// Connection settings for a service's backing store.
#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub host: String,
    pub port: u16,
    pub db_name: String,
    pub username: String,
    pub password: String,
}

impl StoreCredentials {
    /// Load credentials from `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USERNAME`
    /// and `DB_PASSWORD`, falling back to insecure local-dev defaults.
    pub fn from_env(db_name: &str) -> Self {
        Self {
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(27017),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| db_name.to_string()),
            username: env::var("DB_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
        }
    }

    /// Connection string for driver-backed adapters.
    #[must_use]
    pub fn connection_string(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}
