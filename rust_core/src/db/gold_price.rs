//! Gold price database operations
//!
//! Stores quote snapshots in the `gold_prices` table:
//! `id SERIAL`, `asset_name VARCHAR(255)`, `buy_price DOUBLE PRECISION`,
//! `sell_price DOUBLE PRECISION`, `timestamp TIMESTAMPTZ DEFAULT NOW()`.

use crate::models::{FetchResult, GoldPrice, NewGoldPrice};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};

/// Insert a single price snapshot, returning the stored row
pub async fn insert_gold_price(pool: &PgPool, price: &NewGoldPrice) -> Result<GoldPrice> {
    let record = sqlx::query_as::<_, GoldPrice>(
        r#"
        INSERT INTO gold_prices (asset_name, buy_price, sell_price, timestamp)
        VALUES ($1, $2, $3, $4)
        RETURNING id, asset_name, buy_price, sell_price, timestamp
        "#,
    )
    .bind(&price.asset_name)
    .bind(price.buy_price)
    .bind(price.sell_price)
    .bind(price.timestamp)
    .fetch_one(pool)
    .await
    .context("Failed to insert gold price")?;

    debug!(
        "Inserted {} price: buy={} sell={}",
        price.asset_name, price.buy_price, price.sell_price
    );

    Ok(record)
}

/// Insert one snapshot per quote in `result`, all stamped with `timestamp`.
///
/// Failed inserts are logged and skipped; returns how many rows were stored.
pub async fn insert_fetch_result(
    pool: &PgPool,
    result: &FetchResult,
    timestamp: DateTime<Utc>,
) -> Result<usize> {
    let mut count = 0;
    for (label, quote) in result.iter() {
        let record = NewGoldPrice::from_quote(label, quote, timestamp);
        match insert_gold_price(pool, &record).await {
            Ok(_) => count += 1,
            Err(e) => warn!("Failed to insert {} price: {:#}", label, e),
        }
    }

    Ok(count)
}

/// Get the most recent snapshot for an asset
pub async fn latest_gold_price(pool: &PgPool, asset_name: &str) -> Result<Option<GoldPrice>> {
    let record = sqlx::query_as::<_, GoldPrice>(
        r#"
        SELECT id, asset_name, buy_price, sell_price, timestamp
        FROM gold_prices
        WHERE asset_name = $1
        ORDER BY timestamp DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(asset_name)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch latest gold price")?;

    Ok(record)
}
