//! Row shapes for the `gold_prices` and `users` tables.

use super::PriceQuote;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored price snapshot (`gold_prices`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GoldPrice {
    pub id: i32,
    /// Label of the tracked item, e.g. "VÀNG MIẾNG VRTL (Vàng Rồng Thăng Long)"
    pub asset_name: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Price snapshot waiting to be inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoldPrice {
    pub asset_name: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub timestamp: DateTime<Utc>,
}

impl NewGoldPrice {
    pub fn from_quote(label: &str, quote: &PriceQuote, timestamp: DateTime<Utc>) -> Self {
        Self {
            asset_name: label.to_string(),
            buy_price: quote.buy_value,
            sell_price: quote.sell_value,
            timestamp,
        }
    }
}

/// Messaging-platform user (`users`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}
