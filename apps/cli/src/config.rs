//! CLI configuration.

use std::env;

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:shopping.db?mode=rwc";

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL.
    pub database_url: String,
    /// Log level.
    pub log_level: String,
    /// Whether to insert the built-in categories into an empty database.
    pub seed_on_start: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("SHOPLIST_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            anyhow::bail!("SHOPLIST_DATABASE_URL must not be empty");
        }

        Ok(Self {
            database_url,
            log_level: env::var("SHOPLIST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            seed_on_start: env::var("SHOPLIST_SEED_ON_START")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(true),
        })
    }
}
