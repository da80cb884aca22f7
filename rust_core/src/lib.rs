//! Bullion Core - BTMC precious-metal price feed.
//!
//! This crate provides:
//! - An HTTP client for the BTMC XML price board
//! - Row filtering and defensive price formatting
//! - Record shapes and PostgreSQL helpers for price snapshots and users

pub mod clients;
pub mod db;
pub mod models;
pub mod utils;

pub use clients::{BtmcClient, PriceFeed};
pub use models::{FetchResult, PriceQuote, TrackedItem};
