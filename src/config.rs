//! Environment configuration.
//!
//! `TELEGRAM_BOT_TOKEN` is required. `ADMIN_ID` enables exchange
//! notifications, `DATABASE_URL` switches persistence from the in-memory map
//! to MySQL, and `WEBHOOK_URL`/`PORT` switch update delivery from long
//! polling to a webhook.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{0} is not valid: {1}")]
    Invalid(&'static str, String),
}

const DEFAULT_PORT: u16 = 5000;

pub struct Config {
    pub bot_token: String,
    pub admin_id: Option<i64>,
    pub database_url: Option<String>,
    pub webhook_url: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let admin_id = match std::env::var("ADMIN_ID") {
            Ok(v) => Some(
                v.parse::<i64>()
                    .map_err(|e| ConfigError::Invalid("ADMIN_ID", e.to_string()))?,
            ),
            Err(_) => None,
        };

        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|e| ConfigError::Invalid("PORT", e.to_string()))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            bot_token,
            admin_id,
            database_url: std::env::var("DATABASE_URL").ok(),
            webhook_url: std::env::var("WEBHOOK_URL").ok(),
            port,
        })
    }
}
