//! Error types for the BTMC feed client.
//!
//! None of these cross the public `fetch`/`parse` boundary: request errors
//! become an absent result and content errors become omitted quotes.

use std::num::ParseFloatError;
use thiserror::Error;

/// Failure while requesting the feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connect, timeout, or body read error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed answered with a non-2xx status
    #[error("Unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

/// Failure while reading the feed document
#[derive(Debug, Error)]
pub enum FeedParseError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Document root is not `<DataList>`
    #[error("Unexpected root element <{0}>")]
    UnexpectedRoot(String),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Document ended inside <{0}>")]
    UnexpectedEof(String),

    /// Text or a second element outside the root
    #[error("Content outside the root element")]
    ContentOutsideRoot,
}

/// Failure while reading one price attribute
#[derive(Debug, Error)]
pub enum PriceParseError {
    #[error("'{value}' is not a number: {source}")]
    NotANumber {
        value: String,
        source: ParseFloatError,
    },

    #[error("'{0}' is not a finite price")]
    NonFinite(String),
}
