use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Currency stamped on every invoice created by this process.
    pub currency: String,
    pub log_level: String,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let db_url = env::var("RETAIL_DATABASE_URL")
            .context("RETAIL_DATABASE_URL must be set")?;
        let currency = env::var("RETAIL_CURRENCY").unwrap_or_else(|_| "GBP".to_string());
        let log_level = env::var("RETAIL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database: DatabaseConfig {
                url: Secret::new(db_url),
            },
            currency,
            log_level,
            service_name: "retail-service".to_string(),
        })
    }
}
