//! Price Feed Trait
//!
//! Common interface for sources that produce a [`FetchResult`], so the
//! fetcher service can run against the BTMC client or a stand-in.

use crate::models::FetchResult;
use async_trait::async_trait;

#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Display name used in logs (e.g. "BTMC")
    fn feed_name(&self) -> &str;

    /// Fetch current quotes.
    ///
    /// # Returns
    /// * `Some(result)` - The feed answered; `result` may be empty
    /// * `None` - The request failed
    async fn fetch(&self) -> Option<FetchResult>;
}
