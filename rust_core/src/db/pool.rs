//! Database connection pooling and configuration.
//!
//! This module provides pool creation with:
//! - Timeout and connection settings overridable from the environment
//! - A health check on every acquired connection
//! - `DATABASE_URL`, or a URL assembled from `DB_*` parts

use anyhow::{Context, Result};
use reqwest::Url;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use std::time::Duration;

pub const DEFAULT_DB_PORT: &str = "5432";

/// Database pool configuration
#[derive(Debug, Clone)]
pub struct DbPoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Timeout for acquiring a connection
    pub acquire_timeout: Duration,
    /// How long idle connections are kept alive
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
    /// Ping connections before handing them out
    pub test_before_acquire: bool,
}

impl Default for DbPoolConfig {
    fn default() -> Self {
        Self {
            // 10 steady connections plus 20 overflow
            max_connections: 30,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),   // 10 minutes
            max_lifetime: Duration::from_secs(1800),  // 30 minutes
            test_before_acquire: true,
        }
    }
}

impl DbPoolConfig {
    /// Create config from environment variables with fallback to provided defaults
    pub fn from_env_with_defaults(defaults: Self) -> Self {
        Self {
            max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
            min_connections: env_parse("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
            acquire_timeout: env_parse("DB_ACQUIRE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            idle_timeout: env_parse("DB_IDLE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            max_lifetime: env_parse("DB_MAX_LIFETIME_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_lifetime),
            test_before_acquire: defaults.test_before_acquire,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Resolve the database URL from the process environment.
///
/// `DATABASE_URL` wins; otherwise the URL is built from `DB_USER`,
/// `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and `DB_NAME`, with the credentials
/// percent-encoded.
pub fn database_url_from_env() -> Option<String> {
    resolve_database_url(|key| env::var(key).ok())
}

/// Same as [`database_url_from_env`], reading variables through `lookup`
pub fn resolve_database_url<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty("DATABASE_URL") {
        return Some(url);
    }

    let user = non_empty("DB_USER")?;
    let host = non_empty("DB_HOST")?;
    let name = non_empty("DB_NAME")?;
    let port = non_empty("DB_PORT").unwrap_or_else(|| DEFAULT_DB_PORT.to_string());

    let mut url = match Url::parse(&format!("postgres://{}:{}/{}", host, port, name)) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Invalid DB_HOST/DB_PORT/DB_NAME: {}", e);
            return None;
        }
    };
    url.set_username(&user).ok()?;
    url.set_password(non_empty("DB_PASSWORD").as_deref()).ok()?;

    Some(url.to_string())
}

/// Create a database connection pool with the given configuration.
///
/// # Example
/// ```ignore
/// let pool = create_pool(&database_url, &DbPoolConfig::default()).await?;
/// ```
pub async fn create_pool(database_url: &str, config: &DbPoolConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .test_before_acquire(config.test_before_acquire)
        .connect(database_url)
        .await
        .context("Failed to create database connection pool")?;

    tracing::info!(
        "Database pool created: max={}, min={}, acquire_timeout={}s",
        config.max_connections,
        config.min_connections,
        config.acquire_timeout.as_secs()
    );

    Ok(pool)
}

/// Create a database connection pool from the environment.
pub async fn create_default_pool() -> Result<PgPool> {
    let database_url = database_url_from_env()
        .context("DATABASE_URL (or DB_USER/DB_HOST/DB_NAME) must be set")?;

    let config = DbPoolConfig::from_env_with_defaults(DbPoolConfig::default());
    create_pool(&database_url, &config).await
}
