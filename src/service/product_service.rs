//! Product service: catalog operations and URL testing.

use std::sync::Arc;

use url::Url;

use crate::domain::{
    AlertEntry, HistoryOrder, HistoryView, NewProduct, ProductDetail, ProductId,
    ProductRegistry, ProductSummary, ProductUpdate, RegistryStatistics, detect_store,
    parse_source_url,
};
use crate::error::TrackerError;
use crate::probe::{PriceProbe, ProbeResult};

/// Diagnostic result of probing a URL before tracking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTestReport {
    /// The validated URL.
    pub url: Url,
    /// Host part of the URL.
    pub domain: String,
    /// Detected store, if any.
    pub store: Option<String>,
    /// What the probe found.
    pub result: ProbeResult,
}

/// Orchestration layer for product CRUD, URL testing and dashboard reads.
///
/// Stateless coordinator: owns a reference to the [`ProductRegistry`] for
/// state and a [`PriceProbe`] for the test-URL flow. Creating or updating a
/// product never probes.
#[derive(Debug, Clone)]
pub struct ProductService {
    registry: Arc<ProductRegistry>,
    probe: PriceProbe,
}

impl ProductService {
    /// Creates a new `ProductService`.
    #[must_use]
    pub fn new(registry: Arc<ProductRegistry>, probe: PriceProbe) -> Self {
        Self { registry, probe }
    }

    /// Returns a reference to the inner [`ProductRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ProductRegistry> {
        &self.registry
    }

    /// Lists all products with their aggregates and alert state.
    pub async fn list_products(&self) -> Vec<ProductSummary> {
        self.registry.list().await
    }

    /// Returns a product with its full history.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID.
    pub async fn get_product(
        &self,
        id: ProductId,
        order: HistoryOrder,
    ) -> Result<ProductDetail, TrackerError> {
        self.registry.detail(id, order).await
    }

    /// Returns a product's observations with their aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID.
    pub async fn history(
        &self,
        id: ProductId,
        order: HistoryOrder,
    ) -> Result<HistoryView, TrackerError> {
        self.registry.history(id, order).await
    }

    /// Starts tracking a new product.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or
    /// [`TrackerError::PersistenceError`] if storing fails.
    pub async fn create_product(&self, input: NewProduct) -> Result<ProductSummary, TrackerError> {
        let summary = self.registry.create(input).await?;
        tracing::info!(
            product_id = %summary.product.id,
            store = ?summary.product.store,
            "product created"
        );
        Ok(summary)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID, a
    /// validation error for bad fields, or
    /// [`TrackerError::PersistenceError`] if storing fails.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<ProductSummary, TrackerError> {
        let summary = self.registry.update(id, update).await?;
        tracing::info!(product_id = %id, "product updated");
        Ok(summary)
    }

    /// Stops tracking a product and discards its history.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::ProductNotFound`] for an unknown ID, or
    /// [`TrackerError::PersistenceError`] if the delete fails.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), TrackerError> {
        self.registry.delete(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Probes a URL without storing anything.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidUrl`] if the URL is malformed.
    pub async fn test_url(&self, raw_url: &str) -> Result<UrlTestReport, TrackerError> {
        let result = self.probe.probe(raw_url).await?;
        let url = parse_source_url(raw_url)?;
        Ok(UrlTestReport {
            domain: url.host_str().unwrap_or_default().to_string(),
            store: detect_store(&url),
            url,
            result,
        })
    }

    /// Computes dashboard statistics.
    pub async fn statistics(&self) -> RegistryStatistics {
        self.registry.statistics().await
    }

    /// Lists products whose alert is triggered.
    pub async fn alerts(&self) -> Vec<AlertEntry> {
        self.registry.alerts().await
    }
}
