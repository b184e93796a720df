//! Refresh service: probes product pages and records new prices.
//!
//! [`RefreshService::refresh_all`] is the batch entry point. It snapshots
//! the product IDs, probes them with bounded concurrency and returns one
//! [`RefreshEntry`] per product in snapshot order. Every item runs in its own
//! task, so neither an error nor a panic in one item can abort the batch.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use tokio::time::Instant;

use crate::domain::{
    PriceObservation, ProductId, ProductRegistry, RefreshEntry, RefreshOutcome, RefreshReport,
};
use crate::error::TrackerError;
use crate::probe::{PriceProbe, ProbeResult};

/// Drives [`PriceProbe`] for one or all products and appends successful
/// observations to the registry.
#[derive(Debug, Clone)]
pub struct RefreshService {
    registry: Arc<ProductRegistry>,
    probe: PriceProbe,
    max_concurrency: usize,
    deadline: Option<Duration>,
}

impl RefreshService {
    /// Creates a new `RefreshService`.
    ///
    /// `max_concurrency` is clamped to at least 1. With a `deadline`, any
    /// batch probe still running that long after the batch started is
    /// reported as unreachable.
    #[must_use]
    pub fn new(
        registry: Arc<ProductRegistry>,
        probe: PriceProbe,
        max_concurrency: usize,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            probe,
            max_concurrency: max_concurrency.max(1),
            deadline,
        }
    }

    /// Refreshes one product.
    ///
    /// The probe runs without holding any registry lock. History only grows
    /// when a price was extracted. An inactive product is reported as
    /// [`RefreshOutcome::Inactive`] without fetching its page.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] if the product does not
    /// exist (or is deleted while probing), or
    /// [`TrackerError::PersistenceError`] if the observation cannot be
    /// stored.
    pub async fn refresh_one(&self, id: ProductId) -> Result<RefreshOutcome, TrackerError> {
        let Some(url) = self.registry.refresh_url(id).await? else {
            return Ok(RefreshOutcome::Inactive);
        };
        let result = self.probe.probe_url(&url).await;
        self.record(id, result).await
    }

    /// Refreshes every product present when the call starts.
    ///
    /// Never fails: per-item errors are reported as
    /// [`RefreshOutcome::Failed`] entries.
    pub async fn refresh_all(&self) -> RefreshReport {
        let ids = self.registry.ids().await;
        // A deadline too far out to represent is no deadline at all.
        let deadline = self
            .deadline
            .and_then(|d| Instant::now().checked_add(d));

        let entries: Vec<RefreshEntry> = stream::iter(ids)
            .map(|product_id| {
                let service = self.clone();
                async move {
                    let task = tokio::spawn(async move {
                        service.refresh_item(product_id, deadline).await
                    });
                    let outcome = match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::warn!(%product_id, error = %e, "refresh task aborted");
                            RefreshOutcome::Failed {
                                reason: "refresh task aborted".to_string(),
                            }
                        }
                    };
                    RefreshEntry {
                        product_id,
                        outcome,
                    }
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let report = RefreshReport::new(entries);
        let summary = report.summary;
        tracing::info!(
            total = summary.total,
            updated = summary.updated,
            no_price = summary.no_price,
            unreachable = summary.unreachable,
            inactive = summary.inactive,
            failed = summary.failed,
            "batch refresh finished"
        );
        report
    }

    async fn refresh_item(&self, id: ProductId, deadline: Option<Instant>) -> RefreshOutcome {
        let url = match self.registry.refresh_url(id).await {
            Ok(Some(url)) => url,
            Ok(None) => return RefreshOutcome::Inactive,
            Err(e) => return failed(id, &e),
        };

        let probe = self.probe.probe_url(&url);
        let result = match deadline {
            Some(at) => tokio::time::timeout_at(at, probe)
                .await
                .unwrap_or_else(|_| ProbeResult::timeout()),
            None => probe.await,
        };

        match self.record(id, result).await {
            Ok(outcome) => outcome,
            Err(e) => failed(id, &e),
        }
    }

    async fn record(
        &self,
        id: ProductId,
        result: ProbeResult,
    ) -> Result<RefreshOutcome, TrackerError> {
        match result {
            ProbeResult::Accessible { price } => {
                let summary = self
                    .registry
                    .append_observation(id, PriceObservation::now(price)?)
                    .await?;
                if summary.alert.triggered {
                    tracing::info!(
                        product_id = %id,
                        %price,
                        target = ?summary.product.target_price,
                        "price alert triggered"
                    );
                }
                Ok(RefreshOutcome::Updated { price })
            }
            ProbeResult::AccessibleNoPrice => Ok(RefreshOutcome::NoPriceFound),
            ProbeResult::Inaccessible { reason } => Ok(RefreshOutcome::Unreachable { reason }),
        }
    }
}

fn failed(id: ProductId, error: &TrackerError) -> RefreshOutcome {
    tracing::warn!(product_id = %id, error = %error, "refresh item failed");
    let reason = match error {
        TrackerError::ProductNotFound(_) => "product no longer exists",
        TrackerError::PersistenceError(_) => "storage error",
        _ => "internal error",
    };
    RefreshOutcome::Failed {
        reason: reason.to_string(),
    }
}
