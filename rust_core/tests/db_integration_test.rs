//! Database Integration Tests
//!
//! These tests require a PostgreSQL server reachable through DATABASE_URL
//! and should be run with `cargo test --ignored`.

use bullion_rust_core::db::{
    create_pool, get_user_by_telegram_id, insert_fetch_result, latest_gold_price, upsert_user,
    DbPoolConfig,
};
use bullion_rust_core::{FetchResult, PriceQuote};
use chrono::{Duration, Utc};
use sqlx::PgPool;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
    let pool = create_pool(&url, &DbPoolConfig::default()).await.unwrap();

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gold_prices (
            id SERIAL PRIMARY KEY,
            asset_name VARCHAR(255),
            buy_price DOUBLE PRECISION,
            sell_price DOUBLE PRECISION,
            timestamp TIMESTAMPTZ DEFAULT NOW()
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            telegram_id BIGINT UNIQUE NOT NULL,
            username VARCHAR(255),
            joined_at TIMESTAMPTZ DEFAULT NOW()
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

#[tokio::test]
#[ignore] // Requires database
async fn test_insert_fetch_result_and_read_latest() {
    let pool = test_pool().await;
    let label = format!("TEST ASSET {}", Utc::now().timestamp_nanos_opt().unwrap_or_default());

    let mut older = FetchResult::new();
    older.insert(label.as_str(), PriceQuote::from_values(1_000.0, 1_100.0));
    let inserted = insert_fetch_result(&pool, &older, Utc::now() - Duration::minutes(5))
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let mut newer = FetchResult::new();
    newer.insert(label.as_str(), PriceQuote::from_values(17_800_000.0, 18_100_000.0));
    insert_fetch_result(&pool, &newer, Utc::now()).await.unwrap();

    let latest = latest_gold_price(&pool, &label).await.unwrap().unwrap();
    assert_eq!(latest.asset_name.as_deref(), Some(label.as_str()));
    assert_eq!(latest.buy_price, Some(17_800_000.0));
    assert_eq!(latest.sell_price, Some(18_100_000.0));
}

#[tokio::test]
#[ignore] // Requires database
async fn test_upsert_user_updates_username() {
    let pool = test_pool().await;
    let telegram_id = Utc::now().timestamp_micros();

    let created = upsert_user(&pool, telegram_id, Some("first")).await.unwrap();
    assert_eq!(created.telegram_id, telegram_id);
    assert_eq!(created.username.as_deref(), Some("first"));

    let updated = upsert_user(&pool, telegram_id, Some("second")).await.unwrap();
    assert_eq!(updated.id, created.id);

    let fetched = get_user_by_telegram_id(&pool, telegram_id).await.unwrap().unwrap();
    assert_eq!(fetched.username.as_deref(), Some("second"));

    assert!(get_user_by_telegram_id(&pool, -telegram_id).await.unwrap().is_none());
}
