//! Configuration for the price fetcher
//!
//! Everything comes from the environment (a `.env` file is loaded first):
//! - `BTMC_API_KEY` (required)
//! - `BTMC_BASE_URL` to point at another feed host
//! - `BTMC_TIMEOUT_SECS` request timeout
//! - `FETCH_INTERVAL_SECS` repeat interval; unset or 0 runs a single fetch
//! - `DATABASE_URL` or `DB_USER`/`DB_PASSWORD`/`DB_HOST`/`DB_PORT`/`DB_NAME`

use anyhow::{bail, Result};
use bullion_rust_core::db::pool::resolve_database_url;
use std::env;
use std::time::Duration;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default repeat interval in seconds (0 = single fetch)
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 0;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// `None` runs a single fetch
    pub fetch_interval: Option<Duration>,
    /// `None` disables persistence
    pub database_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match lookup("BTMC_API_KEY").filter(|v| !v.trim().is_empty()) {
            Some(key) => key,
            None => bail!("BTMC_API_KEY must be set"),
        };

        let base_url = lookup("BTMC_BASE_URL").filter(|v| !v.trim().is_empty());

        let timeout = Duration::from_secs(
            lookup("BTMC_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        let interval_secs = lookup("FETCH_INTERVAL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FETCH_INTERVAL_SECS);
        let fetch_interval = (interval_secs > 0).then(|| Duration::from_secs(interval_secs));

        Ok(Self {
            api_key,
            base_url,
            timeout,
            fetch_interval,
            database_url: resolve_database_url(&lookup),
        })
    }
}
