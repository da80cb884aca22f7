// Shared models for the BTMC price feed and its persistence layer
use crate::utils::format::format_grouped;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

mod records;

pub use records::{GoldPrice, NewGoldPrice, User};

// ============================================================================
// Feed Configuration
// ============================================================================

/// A feed row we care about, paired with the label it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedItem {
    /// Value of the `row` attribute in the feed (e.g. "1", "102")
    pub row_id: String,
    /// Human-readable asset name used as the result key
    pub label: String,
}

impl TrackedItem {
    pub fn new(row_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            label: label.into(),
        }
    }
}

// ============================================================================
// Parsed Feed Rows
// ============================================================================

/// Attributes of one `<Data>` element, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedRow {
    attributes: HashMap<String, String>,
}

impl FeedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The row identifier (`row` attribute), if present
    pub fn row_id(&self) -> Option<&str> {
        self.get("row")
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FeedRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A child element that may occur once or repeatedly under its parent.
///
/// Document readers see a lone `<Data>` and a run of them differently;
/// `into_vec` gives both the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Append another occurrence, promoting `One` to `Many`
    pub fn push(self, item: T) -> Self {
        match self {
            OneOrMany::One(first) => OneOrMany::Many(vec![first, item]),
            OneOrMany::Many(mut items) => {
                items.push(item);
                OneOrMany::Many(items)
            }
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

// ============================================================================
// Quotes
// ============================================================================

/// Buy/sell pair for one tracked item.
///
/// `buy` and `sell` are display strings (whole units, grouped). The parsed
/// numbers are kept alongside for storage and are not serialized.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PriceQuote {
    pub buy: String,
    pub sell: String,
    #[serde(skip)]
    pub buy_value: f64,
    #[serde(skip)]
    pub sell_value: f64,
}

impl PriceQuote {
    pub fn from_values(buy: f64, sell: f64) -> Self {
        Self {
            buy: format_grouped(buy),
            sell: format_grouped(sell),
            buy_value: buy,
            sell_value: sell,
        }
    }
}

/// Quotes keyed by label, in tracked-item declaration order.
///
/// An empty result means the feed answered but nothing usable was in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    entries: Vec<(String, PriceQuote)>,
}

impl FetchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quote; an existing label keeps its position and takes the new quote
    pub fn insert(&mut self, label: impl Into<String>, quote: PriceQuote) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = quote,
            None => self.entries.push((label, quote)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&PriceQuote> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, quote)| quote)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriceQuote)> {
        self.entries
            .iter()
            .map(|(label, quote)| (label.as_str(), quote))
    }
}

impl IntoIterator for FetchResult {
    type Item = (String, PriceQuote);
    type IntoIter = std::vec::IntoIter<(String, PriceQuote)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FetchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, quote) in &self.entries {
            map.serialize_entry(label, quote)?;
        }
        map.end()
    }
}
