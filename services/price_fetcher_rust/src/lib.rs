//! Price fetcher service: pulls BTMC quotes on demand or on a fixed
//! interval and stores them when a database is configured.

pub mod config;
pub mod fetcher;

pub use config::Config;
pub use fetcher::{CycleOutcome, PriceFetcher};
