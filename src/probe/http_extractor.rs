//! Default [`PriceExtractor`] backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use url::Url;

use super::{ExtractError, PriceExtractor, price_parser};
use crate::domain::detect_store;
use crate::error::TrackerError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGES: &str = "es-ES,es;q=0.9,en;q=0.8";

/// Fetches product pages over HTTP and scans the HTML for a price.
#[derive(Debug, Clone)]
pub struct HttpPriceExtractor {
    client: reqwest::Client,
}

impl HttpPriceExtractor {
    /// Builds an extractor with a browser-like user agent and a per-request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Internal`] if the HTTP client cannot be built
    /// (for example, an invalid user agent header value).
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, TrackerError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGES));

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

fn classify(error: &reqwest::Error) -> ExtractError {
    if error.is_timeout() {
        ExtractError::Timeout
    } else if error.is_connect() {
        ExtractError::Connect
    } else if let Some(status) = error.status() {
        ExtractError::HttpStatus(status.as_u16())
    } else {
        ExtractError::Request(error.to_string())
    }
}

#[async_trait]
impl PriceExtractor for HttpPriceExtractor {
    async fn extract(&self, url: &Url) -> Result<Option<Decimal>, ExtractError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Timeout
            } else {
                ExtractError::Body
            }
        })?;

        let store = detect_store(url);
        let price = price_parser::extract_price(&body, store.as_deref());
        tracing::debug!(%url, store = ?store, price = ?price, "page scanned");
        Ok(price)
    }
}
