//! BTMC API Client
//!
//! Fetches the BTMC price board (XML), keeps the rows we track and turns
//! their buy/sell attributes into display-ready quotes.
//!
//! Failure shape:
//! - request failed (connect, timeout, non-2xx) → `fetch` returns `None`
//! - document unusable → empty [`FetchResult`]
//! - row missing or unparseable → that label is left out

use super::error::{FeedError, FeedParseError, PriceParseError};
use super::feed_xml::read_data_rows;
use super::price_feed::PriceFeed;
use crate::models::{FeedRow, FetchResult, PriceQuote, TrackedItem};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const BTMC_API_URL: &str = "http://api.btmc.vn/api/BTMCAPI/getpricebtmc";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Rows tracked by default
pub mod items {
    /// Phú Quý 999 silver bar, 1 kg
    pub const SILVER_BAR_ROW: &str = "1";
    pub const SILVER_BAR_LABEL: &str = "BẠC MIẾNG PHÚ QUÝ Ag 999 1 KG 1000 GRAM (PHÚ QUÝ)";
    /// Rồng Thăng Long gold bar
    pub const VRTL_GOLD_ROW: &str = "102";
    pub const VRTL_GOLD_LABEL: &str = "VÀNG MIẾNG VRTL (Vàng Rồng Thăng Long)";
}

pub fn default_tracked_items() -> Vec<TrackedItem> {
    vec![
        TrackedItem::new(items::SILVER_BAR_ROW, items::SILVER_BAR_LABEL),
        TrackedItem::new(items::VRTL_GOLD_ROW, items::VRTL_GOLD_LABEL),
    ]
}

/// BTMC price board client
pub struct BtmcClient {
    client: Client,
    base_url: String,
    api_key: String,
    tracked_items: Vec<TrackedItem>,
}

impl BtmcClient {
    /// Create a client with the default timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = build_http_client(DEFAULT_TIMEOUT).unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            fallback_http_client()
        });
        Self::with_http_client(client, api_key)
    }

    /// Create a client with the default timeout, reporting builder failures
    pub fn try_new(api_key: impl Into<String>) -> Result<Self, FeedError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self::with_http_client(build_http_client(timeout)?, api_key))
    }

    /// Create around an existing reqwest client
    pub fn with_http_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: BTMC_API_URL.to_string(),
            api_key: api_key.into(),
            tracked_items: default_tracked_items(),
        }
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the tracked-item table
    pub fn with_tracked_items(mut self, tracked_items: Vec<TrackedItem>) -> Self {
        self.tracked_items = tracked_items;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tracked_items(&self) -> &[TrackedItem] {
        &self.tracked_items
    }

    /// Fetch the price board and extract the tracked quotes.
    ///
    /// Returns `None` only when the request itself failed; a reachable feed
    /// with nothing usable in it gives an empty result.
    pub async fn fetch(&self) -> Option<FetchResult> {
        match self.fetch_body().await {
            Ok(body) => Some(self.parse(&body)),
            Err(e) => {
                error!("Network error fetching BTMC price: {}", e);
                None
            }
        }
    }

    async fn fetch_body(&self) -> Result<String, FeedError> {
        debug!("Fetching price board from {}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus(status));
        }

        Ok(response.text().await?)
    }

    /// Parse a price board document into quotes for the tracked items
    pub fn parse(&self, xml: &str) -> FetchResult {
        let rows = match read_data_rows(xml) {
            Ok(rows) => rows,
            Err(FeedParseError::UnexpectedRoot(root)) => {
                warn!("BTMC feed has unexpected root <{}>, no rows read", root);
                return FetchResult::new();
            }
            Err(e) => {
                error!("XML parsing error: {}", e);
                return FetchResult::new();
            }
        };

        // Later duplicates of a row id win
        let lookup: HashMap<&str, &FeedRow> = rows
            .iter()
            .filter_map(|row| row.row_id().map(|id| (id, row)))
            .collect();

        let mut results = FetchResult::new();
        for item in &self.tracked_items {
            let Some(row) = lookup.get(item.row_id.as_str()) else {
                warn!("Item {} not found in BTMC feed", item.row_id);
                continue;
            };

            if let Some(quote) = extract_quote(row, &item.row_id) {
                results.insert(item.label.as_str(), quote);
            }
        }

        debug!(
            "Parsed {} of {} tracked items from {} rows",
            results.len(),
            self.tracked_items.len(),
            rows.len()
        );
        results
    }
}

impl fmt::Debug for BtmcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BtmcClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("tracked_items", &self.tracked_items)
            .finish()
    }
}

#[async_trait]
impl PriceFeed for BtmcClient {
    fn feed_name(&self) -> &str {
        "BTMC"
    }

    async fn fetch(&self) -> Option<FetchResult> {
        BtmcClient::fetch(self).await
    }
}

/// Extract the buy (`pb_<id>`) and sell (`ps_<id>`) prices of one row.
///
/// Missing or empty attributes give `None` quietly; values that are not
/// finite numbers are logged and give `None`.
pub fn extract_quote(row: &FeedRow, row_id: &str) -> Option<PriceQuote> {
    let buy = row
        .get(&format!("pb_{}", row_id))
        .filter(|value| !value.is_empty())?;
    let sell = row
        .get(&format!("ps_{}", row_id))
        .filter(|value| !value.is_empty())?;

    match (parse_price(buy), parse_price(sell)) {
        (Ok(buy), Ok(sell)) => Some(PriceQuote::from_values(buy, sell)),
        (Err(e), _) | (_, Err(e)) => {
            error!("Error parsing price for key {}: {}", row_id, e);
            None
        }
    }
}

fn parse_price(raw: &str) -> Result<f64, PriceParseError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|source| PriceParseError::NotANumber {
            value: raw.to_string(),
            source,
        })?;

    if !value.is_finite() {
        return Err(PriceParseError::NonFinite(raw.to_string()));
    }
    Ok(value)
}

// Redirects are not followed: a 3xx from the feed is a failed request.
fn build_http_client(timeout: Duration) -> Result<Client, FeedError> {
    Ok(Client::builder()
        .timeout(timeout)
        .redirect(Policy::none())
        .user_agent(concat!("bullion/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

fn fallback_http_client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_XML_FULL: &str = r#"
<DataList>
    <Data row="1" n_1="BẠC MIẾNG PHÚ QUÝ Ag 999 1 KG 1000 GRAM (PHÚ QUÝ)" pb_1="80533132" ps_1="83013126" />
    <Data row="102" n_102="VÀNG MIẾNG VRTL (Vàng Rồng Thăng Long)" pb_102="17800000" ps_102="18100000" />
</DataList>
"#;

    fn row(attrs: &[(&str, &str)]) -> FeedRow {
        attrs.iter().copied().collect()
    }

    fn client() -> BtmcClient {
        BtmcClient::new("test_api_key")
    }

    #[test]
    fn test_default_configuration() {
        let client = client();
        assert_eq!(client.base_url(), BTMC_API_URL);
        assert_eq!(client.tracked_items().len(), 2);
        assert_eq!(client.tracked_items()[0].row_id, "1");
        assert_eq!(client.tracked_items()[1].label, items::VRTL_GOLD_LABEL);
    }

    #[test]
    fn test_try_new_uses_defaults() {
        let client = BtmcClient::try_new("test_api_key").unwrap();
        assert_eq!(client.base_url(), BTMC_API_URL);
        assert_eq!(client.tracked_items(), default_tracked_items().as_slice());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("test_api_key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_parse_full_document() {
        let result = client().parse(MOCK_XML_FULL);

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.labels().collect::<Vec<_>>(),
            vec![items::SILVER_BAR_LABEL, items::VRTL_GOLD_LABEL]
        );

        let silver = result.get(items::SILVER_BAR_LABEL).unwrap();
        assert_eq!(silver.buy, "80,533,132");
        assert_eq!(silver.sell, "83,013,126");

        let gold = result.get(items::VRTL_GOLD_LABEL).unwrap();
        assert_eq!(gold.buy, "17,800,000");
        assert_eq!(gold.sell, "18,100,000");
    }

    #[test]
    fn test_parse_follows_declaration_order_not_feed_order() {
        let xml = r#"<DataList>
            <Data row="102" pb_102="2" ps_102="2" />
            <Data row="1" pb_1="1" ps_1="1" />
        </DataList>"#;

        let result = client().parse(xml);
        assert_eq!(
            result.labels().collect::<Vec<_>>(),
            vec![items::SILVER_BAR_LABEL, items::VRTL_GOLD_LABEL]
        );
    }

    #[test]
    fn test_parse_skips_missing_rows() {
        let xml = r#"<DataList><Data row="1" n_1="BẠC MIẾNG" pb_1="80000000" ps_1="82000000" /></DataList>"#;

        let result = client().parse(xml);
        assert_eq!(result.len(), 1);
        assert!(result.contains_label(items::SILVER_BAR_LABEL));
        assert!(!result.contains_label(items::VRTL_GOLD_LABEL));
    }

    #[test]
    fn test_parse_skips_rows_with_bad_prices() {
        let xml = r#"<DataList>
            <Data row="1" pb_1="80533132" ps_1="83013126" />
            <Data row="102" pb_102="KHÔNG_CÓ_GIÁ" ps_102="18100000" />
        </DataList>"#;

        let result = client().parse(xml);
        assert_eq!(result.len(), 1);
        assert!(!result.contains_label(items::VRTL_GOLD_LABEL));
    }

    #[test]
    fn test_parse_unusable_documents_give_empty_result() {
        let client = client();
        assert!(client.parse("<Invalid>No Data Here</Invalid>").is_empty());
        assert!(client.parse("").is_empty());
        assert!(client.parse("<DataList><Data row=\"1\"").is_empty());
        assert!(client.parse("<DataList/>").is_empty());
    }

    #[test]
    fn test_parse_with_custom_items() {
        let client = client().with_tracked_items(vec![TrackedItem::new("7", "Platinum")]);
        let xml = r#"<DataList><Data row="7" pb_7="1234.6" ps_7="2000" /></DataList>"#;

        let result = client.parse(xml);
        assert_eq!(result.get("Platinum").unwrap().buy, "1,235");
    }

    #[test]
    fn test_extract_quote_success() {
        let quote = extract_quote(
            &row(&[("row", "102"), ("pb_102", "17800000"), ("ps_102", "18100000")]),
            "102",
        )
        .unwrap();

        assert_eq!(quote.buy, "17,800,000");
        assert_eq!(quote.sell, "18,100,000");
        assert_eq!(quote.sell_value, 18_100_000.0);
    }

    #[test]
    fn test_extract_quote_invalid_price_format() {
        let bad = row(&[("row", "102"), ("pb_102", "KHÔNG_CÓ_GIÁ"), ("ps_102", "18100000")]);
        assert!(extract_quote(&bad, "102").is_none());

        let bad = row(&[("row", "102"), ("pb_102", "17800000"), ("ps_102", "inf")]);
        assert!(extract_quote(&bad, "102").is_none());
    }

    #[test]
    fn test_extract_quote_missing_or_empty_keys() {
        assert!(extract_quote(&row(&[("row", "102")]), "102").is_none());
        assert!(extract_quote(&row(&[("row", "102"), ("pb_102", "1")]), "102").is_none());

        let empty = row(&[("row", "102"), ("pb_102", ""), ("ps_102", "18100000")]);
        assert!(extract_quote(&empty, "102").is_none());
    }

    #[test]
    fn test_extract_quote_uses_row_id_for_attribute_names() {
        // Attributes for another row id are not picked up
        let other = row(&[("row", "102"), ("pb_1", "1"), ("ps_1", "2")]);
        assert!(extract_quote(&other, "102").is_none());
        assert!(extract_quote(&other, "1").is_some());
    }

    #[test]
    fn test_parse_price_trims_whitespace() {
        assert_eq!(parse_price(" 17800000 ").unwrap(), 17_800_000.0);
        assert!(parse_price("   ").is_err());
        assert!(parse_price("NaN").is_err());
    }
}
