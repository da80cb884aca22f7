pub mod btmc;
pub mod error;
pub mod feed_xml;
pub mod price_feed;

// Re-export commonly used types
pub use btmc::{default_tracked_items, extract_quote, BtmcClient, BTMC_API_URL};
pub use error::{FeedError, FeedParseError, PriceParseError};
pub use price_feed::PriceFeed;
