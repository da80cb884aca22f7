//! Fetch cycle: pull quotes from a feed, log them, store them.

use anyhow::Result;
use bullion_rust_core::db::insert_fetch_result;
use bullion_rust_core::{FetchResult, PriceFeed};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// What one fetch cycle produced
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The feed could not be reached; nothing was stored
    Unreachable,
    Fetched {
        result: FetchResult,
        fetched_at: DateTime<Utc>,
        /// Rows written to `gold_prices` (0 without a database)
        stored: usize,
    },
}

pub struct PriceFetcher<F: PriceFeed> {
    feed: F,
    pool: Option<PgPool>,
}

impl<F: PriceFeed> PriceFetcher<F> {
    pub fn new(feed: F, pool: Option<PgPool>) -> Self {
        Self { feed, pool }
    }

    /// Run one fetch and persist whatever it returned
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let fetched_at = Utc::now();

        let Some(result) = self.feed.fetch().await else {
            warn!("{} feed unreachable, nothing stored", self.feed.feed_name());
            return Ok(CycleOutcome::Unreachable);
        };

        if result.is_empty() {
            warn!("{} feed returned no tracked quotes", self.feed.feed_name());
        }
        for (label, quote) in result.iter() {
            info!("{}: buy {} / sell {}", label, quote.buy, quote.sell);
        }

        let stored = match &self.pool {
            Some(pool) if !result.is_empty() => {
                insert_fetch_result(pool, &result, fetched_at).await?
            }
            _ => 0,
        };
        if self.pool.is_some() {
            info!("Stored {} of {} quotes", stored, result.len());
        }

        Ok(CycleOutcome::Fetched {
            result,
            fetched_at,
            stored,
        })
    }

    /// Run a cycle every `interval` until Ctrl-C
    pub async fn run(&self, interval: Duration) -> Result<()> {
        info!(
            "Fetch loop started (feed: {}, interval: {}s)",
            self.feed.feed_name(),
            interval.as_secs()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        error!("Fetch cycle failed: {:#}", e);
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping fetch loop");
                    return Ok(());
                }
            }
        }
    }
}
