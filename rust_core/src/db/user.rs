//! User database operations
//!
//! Links a Telegram account to a row in `users`:
//! `id SERIAL`, `telegram_id BIGINT UNIQUE NOT NULL`,
//! `username VARCHAR(255) NULL`, `joined_at TIMESTAMPTZ DEFAULT NOW()`.

use crate::models::User;
use anyhow::{Context, Result};
use sqlx::PgPool;

/// Register a Telegram user, or refresh the username of a known one
pub async fn upsert_user(pool: &PgPool, telegram_id: i64, username: Option<&str>) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (telegram_id, username)
        VALUES ($1, $2)
        ON CONFLICT (telegram_id) DO UPDATE SET username = EXCLUDED.username
        RETURNING id, telegram_id, username, joined_at
        "#,
    )
    .bind(telegram_id)
    .bind(username)
    .fetch_one(pool)
    .await
    .with_context(|| format!("Failed to upsert user with telegram_id={}", telegram_id))?;

    Ok(user)
}

pub async fn get_user_by_telegram_id(pool: &PgPool, telegram_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, telegram_id, username, joined_at
        FROM users
        WHERE telegram_id = $1
        "#,
    )
    .bind(telegram_id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch user")?;

    Ok(user)
}
