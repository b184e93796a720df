//! Timeout-bounded probing with normalized results.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use super::PriceExtractor;
use crate::domain::parse_source_url;
use crate::error::TrackerError;

/// Normalized result of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeResult {
    /// The page was reachable and a price was extracted.
    Accessible {
        /// Extracted price.
        #[schema(value_type = String)]
        price: Decimal,
    },
    /// The page was reachable but no price was found.
    AccessibleNoPrice,
    /// The page could not be fetched.
    Inaccessible {
        /// Short human-readable reason, e.g. `"timeout"`.
        reason: String,
    },
}

impl ProbeResult {
    /// The timeout outcome.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Inaccessible {
            reason: "timeout".to_string(),
        }
    }
}

/// Runs a [`PriceExtractor`] for one URL, bounded by a timeout.
///
/// Never retries and never persists anything.
#[derive(Debug, Clone)]
pub struct PriceProbe {
    extractor: Arc<dyn PriceExtractor>,
    timeout: Duration,
}

impl PriceProbe {
    /// Creates a probe around the given extractor.
    #[must_use]
    pub fn new(extractor: Arc<dyn PriceExtractor>, timeout: Duration) -> Self {
        Self { extractor, timeout }
    }

    /// Validates a raw URL and probes it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidUrl`] if the URL is empty or malformed.
    /// Probe failures are returned as [`ProbeResult::Inaccessible`], not as
    /// errors.
    pub async fn probe(&self, raw_url: &str) -> Result<ProbeResult, TrackerError> {
        let url = parse_source_url(raw_url)?;
        Ok(self.probe_url(&url).await)
    }

    /// Probes an already validated URL.
    pub async fn probe_url(&self, url: &Url) -> ProbeResult {
        let extracted = tokio::time::timeout(self.timeout, self.extractor.extract(url)).await;
        match extracted {
            Err(_elapsed) => {
                tracing::warn!(%url, "probe timed out");
                ProbeResult::timeout()
            }
            Ok(Ok(Some(price))) if price < Decimal::ZERO => {
                tracing::warn!(%url, %price, "extractor returned a negative price, ignoring");
                ProbeResult::AccessibleNoPrice
            }
            Ok(Ok(Some(price))) => ProbeResult::Accessible { price },
            Ok(Ok(None)) => ProbeResult::AccessibleNoPrice,
            Ok(Err(e)) => {
                tracing::warn!(%url, error = %e, "probe failed");
                ProbeResult::Inaccessible { reason: e.reason() }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::probe::ExtractError;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    #[derive(Debug)]
    struct Fixed(Result<Option<Decimal>, ExtractError>);

    #[async_trait]
    impl PriceExtractor for Fixed {
        async fn extract(&self, _url: &Url) -> Result<Option<Decimal>, ExtractError> {
            self.0.clone()
        }
    }

    #[derive(Debug)]
    struct Stalled;

    #[async_trait]
    impl PriceExtractor for Stalled {
        async fn extract(&self, _url: &Url) -> Result<Option<Decimal>, ExtractError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Some(dec!(1)))
        }
    }

    fn probe_with(result: Result<Option<Decimal>, ExtractError>) -> PriceProbe {
        PriceProbe::new(Arc::new(Fixed(result)), Duration::from_secs(5))
    }

    async fn run(probe: &PriceProbe) -> ProbeResult {
        let Ok(result) = probe.probe("https://shop.example.com/item/1").await else {
            panic!("valid url must be probed");
        };
        result
    }

    #[tokio::test]
    async fn price_found() {
        let result = run(&probe_with(Ok(Some(dec!(49.90))))).await;
        assert_eq!(result, ProbeResult::Accessible { price: dec!(49.90) });
    }

    #[tokio::test]
    async fn no_price_and_negative_price() {
        assert_eq!(run(&probe_with(Ok(None))).await, ProbeResult::AccessibleNoPrice);
        assert_eq!(
            run(&probe_with(Ok(Some(dec!(-3))))).await,
            ProbeResult::AccessibleNoPrice
        );
    }

    #[tokio::test]
    async fn extractor_errors_become_short_reasons() {
        let result = run(&probe_with(Err(ExtractError::HttpStatus(404)))).await;
        assert_eq!(
            result,
            ProbeResult::Inaccessible {
                reason: "http status 404".to_string()
            }
        );
    }

    #[tokio::test]
    async fn slow_extractor_times_out() {
        let probe = PriceProbe::new(Arc::new(Stalled), Duration::from_millis(20));
        assert_eq!(run(&probe).await, ProbeResult::timeout());
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_probing() {
        let probe = probe_with(Ok(Some(dec!(1))));
        for bad in ["", "not a url", "ftp://x.com/a"] {
            assert!(matches!(
                probe.probe(bad).await,
                Err(TrackerError::InvalidUrl(_))
            ));
        }
    }
}
