//! Price probing: fetches a product page and normalizes the result.
//!
//! [`PriceProbe`] wraps a [`PriceExtractor`] with a timeout and turns every
//! outcome into a [`ProbeResult`]. The default extractor,
//! [`HttpPriceExtractor`], fetches the page with `reqwest` and scans the HTML
//! with [`price_parser`]. Tests substitute their own extractors.

pub mod http_extractor;
pub mod price_parser;
pub mod price_probe;

use async_trait::async_trait;
use rust_decimal::Decimal;
use url::Url;

pub use http_extractor::HttpPriceExtractor;
pub use price_probe::{PriceProbe, ProbeResult};

/// Structured failure from a [`PriceExtractor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The request did not finish in time.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// No connection could be established.
    #[error("connection failed")]
    Connect,

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("response body could not be read")]
    Body,
}

impl ExtractError {
    /// Short, stable reason suitable for showing to a user.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Timeout => "timeout".to_string(),
            Self::HttpStatus(code) => format!("http status {code}"),
            Self::Connect => "connection failed".to_string(),
            Self::Request(_) => "request failed".to_string(),
            Self::Body => "unreadable response".to_string(),
        }
    }
}

/// Given a URL, returns the price found on the page, if any.
///
/// Implementations should be idempotent and must not persist anything.
///
/// # Errors
///
/// Returns an [`ExtractError`] when the page could not be fetched.
#[async_trait]
pub trait PriceExtractor: Send + Sync + std::fmt::Debug {
    /// Fetches `url` and extracts a price.
    async fn extract(&self, url: &Url) -> Result<Option<Decimal>, ExtractError>;
}
