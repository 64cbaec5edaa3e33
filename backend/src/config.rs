//! Runtime configuration, read from `GUARANTEES_*` environment variables.

use crate::live::statistics::REFRESH_PERIOD;
use common::HOME_CURRENCY;
use std::time::Duration;
use thiserror::Error;

pub const DB_VAR: &str = "GUARANTEES_DB";
pub const HOST_VAR: &str = "GUARANTEES_HOST";
pub const PORT_VAR: &str = "GUARANTEES_PORT";
pub const CURRENCY_VAR: &str = "GUARANTEES_HOME_CURRENCY";
pub const STATS_REFRESH_VAR: &str = "GUARANTEES_STATS_REFRESH_SECS";
pub const UPLOAD_LIMIT_VAR: &str = "GUARANTEES_UPLOAD_LIMIT_MB";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set; point it at the guarantees database file")]
    NotConfigured(&'static str),

    #[error("Invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub home_currency: String,
    pub stats_refresh: Duration,
    /// Maximum request body size in bytes, for JSON and uploads.
    pub payload_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = get(DB_VAR).ok_or(ConfigError::NotConfigured(DB_VAR))?;
        let port = parse_or(get(PORT_VAR), PORT_VAR, 8080u16)?;
        let refresh_secs = parse_or(get(STATS_REFRESH_VAR), STATS_REFRESH_VAR, REFRESH_PERIOD.as_secs())?;
        if refresh_secs == 0 {
            return Err(ConfigError::Invalid {
                key: STATS_REFRESH_VAR,
                value: "0".to_string(),
            });
        }
        let limit_mb = parse_or(get(UPLOAD_LIMIT_VAR), UPLOAD_LIMIT_VAR, 10usize)?;

        Ok(Self {
            database_path,
            host: get(HOST_VAR).unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            home_currency: get(CURRENCY_VAR).unwrap_or_else(|| HOME_CURRENCY.to_string()),
            stats_refresh: Duration::from_secs(refresh_secs),
            payload_limit: limit_mb * 1024 * 1024,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
