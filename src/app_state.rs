//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ProductRegistry;
use crate::probe::PriceProbe;
use crate::service::{ProductService, RefreshService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Product catalog, URL testing and dashboard reads.
    pub product_service: Arc<ProductService>,
    /// On-demand price refresh.
    pub refresh_service: Arc<RefreshService>,
}

impl AppState {
    /// Wires both services around one registry and probe.
    #[must_use]
    pub fn new(
        registry: Arc<ProductRegistry>,
        probe: PriceProbe,
        refresh_max_concurrency: usize,
        refresh_deadline: Option<Duration>,
    ) -> Self {
        let product_service = Arc::new(ProductService::new(Arc::clone(&registry), probe.clone()));
        let refresh_service = Arc::new(RefreshService::new(
            registry,
            probe,
            refresh_max_concurrency,
            refresh_deadline,
        ));
        Self {
            product_service,
            refresh_service,
        }
    }
}
